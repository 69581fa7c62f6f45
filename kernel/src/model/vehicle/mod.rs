use crate::model::id::{ResidentId, VehicleId};
use chrono::{DateTime, Utc};

pub mod event;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vehicle {
    pub vehicle_id: VehicleId,
    pub resident_id: ResidentId,
    pub license_plate: String,
    pub brand: String,
    pub model: String,
    pub color: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}
