use axum::{
    routing::{delete, get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::{
    resident::{
        delete_resident, get_current_user, list_residents, register_resident, show_resident,
        update_payment_status,
    },
    vehicle::{list_vehicles, register_vehicle, update_vehicle_active},
};

pub fn build_resident_routers() -> Router<AppRegistry> {
    let residents_routers = Router::new()
        .route("/", post(register_resident))
        .route("/", get(list_residents))
        .route("/:resident_id", get(show_resident))
        .route("/:resident_id", delete(delete_resident))
        .route("/:resident_id/payment-status", put(update_payment_status))
        .route("/:resident_id/vehicles", post(register_vehicle))
        .route("/:resident_id/vehicles", get(list_vehicles));

    let vehicles_routers = Router::new().route("/:vehicle_id/active", put(update_vehicle_active));

    Router::new()
        .route("/users/me", get(get_current_user))
        .nest("/residents", residents_routers)
        .nest("/vehicles", vehicles_routers)
}
