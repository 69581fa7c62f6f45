use axum::{
    routing::{get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::parking::{
    assign_spot, cancel_assignment, list_assignments, list_spots, register_spot, run_rotation,
    show_my_assignments,
};

pub fn build_parking_routers() -> Router<AppRegistry> {
    let parking_routers = Router::new()
        .route("/spots", post(register_spot))
        .route("/spots", get(list_spots))
        .route("/assignments", get(list_assignments))
        .route("/assignments", post(assign_spot))
        .route("/assignments/me", get(show_my_assignments))
        .route("/assignments/:assignment_id/cancel", put(cancel_assignment))
        .route("/rotation", post(run_rotation));

    Router::new().nest("/parking", parking_routers)
}
