use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    id::{ResidentId, VehicleId},
    vehicle::{
        event::{CreateVehicle, UpdateVehicleActive},
        Vehicle,
    },
};

#[async_trait]
pub trait VehicleRepository: Send + Sync {
    async fn create(&self, event: CreateVehicle) -> AppResult<VehicleId>;
    async fn find_by_resident_id(&self, resident_id: ResidentId) -> AppResult<Vec<Vehicle>>;
    async fn update_active(&self, event: UpdateVehicleActive) -> AppResult<()>;
}
