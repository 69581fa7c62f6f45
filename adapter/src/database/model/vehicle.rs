use kernel::model::{
    id::{ResidentId, VehicleId},
    vehicle::Vehicle,
};
use sqlx::types::chrono::{DateTime, Utc};

#[derive(sqlx::FromRow)]
pub struct VehicleRow {
    pub vehicle_id: VehicleId,
    pub resident_id: ResidentId,
    pub license_plate: String,
    pub brand: String,
    pub model: String,
    pub color: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<VehicleRow> for Vehicle {
    fn from(value: VehicleRow) -> Self {
        let VehicleRow {
            vehicle_id,
            resident_id,
            license_plate,
            brand,
            model,
            color,
            active,
            created_at,
        } = value;
        Vehicle {
            vehicle_id,
            resident_id,
            license_plate,
            brand,
            model,
            color,
            active,
            created_at,
        }
    }
}
