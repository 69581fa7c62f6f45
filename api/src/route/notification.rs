use axum::{
    routing::{get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::notification::{mark_as_read, send_notification, show_my_notifications};

pub fn build_notification_routers() -> Router<AppRegistry> {
    let notifications_routers = Router::new()
        .route("/", post(send_notification))
        .route("/me", get(show_my_notifications))
        .route("/:notification_id/read", put(mark_as_read));

    Router::new().nest("/notifications", notifications_routers)
}
