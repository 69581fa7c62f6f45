use crate::model::id::{ResidentId, VehicleId};
use derive_new::new;

#[derive(Debug, Clone, new)]
pub struct NewVehicle {
    pub license_plate: String,
    pub brand: String,
    pub model: String,
    pub color: String,
}

#[derive(Debug, new)]
pub struct CreateVehicle {
    pub resident_id: ResidentId,
    pub vehicle: NewVehicle,
}

#[derive(Debug, new)]
pub struct UpdateVehicleActive {
    pub vehicle_id: VehicleId,
    pub active: bool,
}
