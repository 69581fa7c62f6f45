use axum::{routing::get, Router};
use registry::AppRegistry;

use crate::handler::dashboard::show_dashboard;

pub fn build_dashboard_routers() -> Router<AppRegistry> {
    Router::new().route("/dashboard", get(show_dashboard))
}
