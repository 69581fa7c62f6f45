use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::id::{ResidentId, VehicleId};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::AuthorizedUser,
    model::vehicle::{
        CreateVehicleRequest, CreateVehicleRequestWithResidentId, UpdateVehicleActiveRequest,
        UpdateVehicleActiveRequestWithId, VehiclesResponse,
    },
};

// 管理者か、居住者本人のみ
fn ensure_owner_or_admin(user: &AuthorizedUser, resident_id: ResidentId) -> AppResult<()> {
    if user.is_admin() || user.id() == resident_id {
        Ok(())
    } else {
        Err(AppError::ForbiddenOperation)
    }
}

pub async fn register_vehicle(
    user: AuthorizedUser,
    Path(resident_id): Path<ResidentId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateVehicleRequest>,
) -> AppResult<StatusCode> {
    ensure_owner_or_admin(&user, resident_id)?;
    req.validate(&())?;

    registry
        .vehicle_repository()
        .create(CreateVehicleRequestWithResidentId::new(resident_id, req).into())
        .await
        .map(|_| StatusCode::CREATED)
}

pub async fn list_vehicles(
    user: AuthorizedUser,
    Path(resident_id): Path<ResidentId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<VehiclesResponse>> {
    ensure_owner_or_admin(&user, resident_id)?;

    registry
        .vehicle_repository()
        .find_by_resident_id(resident_id)
        .await
        .map(VehiclesResponse::from)
        .map(Json)
}

pub async fn update_vehicle_active(
    user: AuthorizedUser,
    Path(vehicle_id): Path<VehicleId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateVehicleActiveRequest>,
) -> AppResult<StatusCode> {
    user.ensure_admin()?;

    registry
        .vehicle_repository()
        .update_active(UpdateVehicleActiveRequestWithId::new(vehicle_id, req).into())
        .await
        .map(|_| StatusCode::OK)
}
