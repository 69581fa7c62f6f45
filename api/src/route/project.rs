use axum::{
    routing::{get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::project::{
    cast_vote, list_projects, register_project, register_quote, show_project,
    update_project_status,
};

pub fn build_project_routers() -> Router<AppRegistry> {
    let projects_routers = Router::new()
        .route("/", post(register_project))
        .route("/", get(list_projects))
        .route("/:project_id", get(show_project))
        .route("/:project_id/status", put(update_project_status))
        .route("/:project_id/quotes", post(register_quote))
        .route("/:project_id/votes", post(cast_vote));

    Router::new().nest("/projects", projects_routers)
}
