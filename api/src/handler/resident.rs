use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::{id::ResidentId, resident::event::DeleteResident};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::AuthorizedUser,
    model::resident::{
        CreateResidentRequest, ResidentDetailResponse, ResidentResponse, ResidentsResponse,
        UpdatePaymentStatusRequest, UpdatePaymentStatusRequestWithId,
    },
};

pub async fn get_current_user(user: AuthorizedUser) -> Json<ResidentResponse> {
    Json(ResidentResponse::from(user.user))
}

pub async fn register_resident(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateResidentRequest>,
) -> AppResult<(StatusCode, Json<ResidentResponse>)> {
    user.ensure_admin()?;
    req.validate(&())?;

    registry
        .resident_repository()
        .create(req.into())
        .await
        .map(|resident| (StatusCode::CREATED, Json(resident.into())))
}

pub async fn list_residents(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ResidentsResponse>> {
    user.ensure_admin()?;

    registry
        .resident_repository()
        .find_all()
        .await
        .map(ResidentsResponse::from)
        .map(Json)
}

pub async fn show_resident(
    user: AuthorizedUser,
    Path(resident_id): Path<ResidentId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ResidentDetailResponse>> {
    user.ensure_admin()?;

    let resident = registry
        .resident_repository()
        .find_by_id(resident_id)
        .await?
        .ok_or_else(|| {
            AppError::EntityNotFound(format!("居住者（{resident_id}）が見つかりませんでした。"))
        })?;
    let vehicles = registry
        .vehicle_repository()
        .find_by_resident_id(resident_id)
        .await?;

    Ok(Json((resident, vehicles).into()))
}

pub async fn update_payment_status(
    user: AuthorizedUser,
    Path(resident_id): Path<ResidentId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdatePaymentStatusRequest>,
) -> AppResult<StatusCode> {
    user.ensure_admin()?;
    req.validate(&())?;

    let update = UpdatePaymentStatusRequestWithId::new(resident_id, req);
    registry
        .resident_repository()
        .update_payment_status(update.into())
        .await
        .map(|_| StatusCode::OK)
}

pub async fn delete_resident(
    user: AuthorizedUser,
    Path(resident_id): Path<ResidentId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    user.ensure_admin()?;

    registry
        .resident_repository()
        .delete(DeleteResident::new(resident_id))
        .await
        .map(|_| StatusCode::OK)
}
