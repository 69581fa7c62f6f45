use axum::Router;
use registry::AppRegistry;

use super::{
    auth::build_auth_routers, dashboard::build_dashboard_routers,
    health::build_health_check_routers, notification::build_notification_routers,
    parking::build_parking_routers, project::build_project_routers,
    resident::build_resident_routers,
};

pub fn routes() -> Router<AppRegistry> {
    let router = Router::new()
        .merge(build_health_check_routers())
        .merge(build_auth_routers())
        .merge(build_resident_routers())
        .merge(build_parking_routers())
        .merge(build_project_routers())
        .merge(build_notification_routers())
        .merge(build_dashboard_routers());
    Router::new().nest("/api/v1", router)
}
