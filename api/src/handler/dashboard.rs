use axum::{extract::State, Json};
use registry::AppRegistry;
use shared::error::AppResult;

use crate::{extractor::AuthorizedUser, model::dashboard::DashboardResponse};

pub async fn show_dashboard(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<DashboardResponse>> {
    user.ensure_admin()?;

    registry
        .dashboard_repository()
        .summarize()
        .await
        .map(DashboardResponse::from)
        .map(Json)
}
