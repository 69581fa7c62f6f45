use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use garde::Validate;
use kernel::model::{
    id::AssignmentId,
    parking::event::{AssignmentListOptions, CancelAssignment},
};
use registry::AppRegistry;
use shared::error::AppResult;

use crate::{
    extractor::AuthorizedUser,
    model::parking::{
        AssignmentListQuery, AssignmentsResponse, CreateAssignmentRequest,
        CreateParkingSpotRequest, ParkingSpotsResponse, RotationResponse,
    },
};

pub async fn register_spot(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateParkingSpotRequest>,
) -> AppResult<StatusCode> {
    user.ensure_admin()?;
    req.validate(&())?;

    registry
        .parking_repository()
        .create_spot(req.into())
        .await
        .map(|_| StatusCode::CREATED)
}

pub async fn list_spots(
    _user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ParkingSpotsResponse>> {
    registry
        .parking_repository()
        .find_spots()
        .await
        .map(ParkingSpotsResponse::from)
        .map(Json)
}

pub async fn list_assignments(
    user: AuthorizedUser,
    Query(query): Query<AssignmentListQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<AssignmentsResponse>> {
    user.ensure_admin()?;

    registry
        .parking_repository()
        .find_assignments(query.into())
        .await
        .map(AssignmentsResponse::from)
        .map(Json)
}

pub async fn show_my_assignments(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<AssignmentsResponse>> {
    registry
        .parking_repository()
        .find_assignments(AssignmentListOptions::new(None, Some(user.id())))
        .await
        .map(AssignmentsResponse::from)
        .map(Json)
}

pub async fn assign_spot(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateAssignmentRequest>,
) -> AppResult<StatusCode> {
    user.ensure_admin()?;
    req.validate(&())?;

    registry
        .parking_repository()
        .create_assignment(req.into())
        .await
        .map(|_| StatusCode::CREATED)
}

pub async fn cancel_assignment(
    user: AuthorizedUser,
    Path(assignment_id): Path<AssignmentId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    user.ensure_admin()?;

    registry
        .parking_repository()
        .cancel_assignment(CancelAssignment::new(assignment_id, Utc::now()))
        .await
        .map(|_| StatusCode::OK)
}

pub async fn run_rotation(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<RotationResponse>> {
    user.ensure_admin()?;

    registry
        .rotation_repository()
        .rotate(Utc::now())
        .await
        .map(RotationResponse::from)
        .map(Json)
}
