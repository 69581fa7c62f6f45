use kernel::model::{
    id::{AssignmentId, ParkingSpotId, ResidentId, VehicleId},
    parking::{ParkingAssignment, ParkingSpot},
};
use shared::error::AppError;
use sqlx::types::chrono::{DateTime, Utc};

use super::parse_column;

#[derive(sqlx::FromRow)]
pub struct ParkingSpotRow {
    pub spot_id: ParkingSpotId,
    pub spot_number: String,
    pub location: String,
    pub status: String,
}

impl TryFrom<ParkingSpotRow> for ParkingSpot {
    type Error = AppError;

    fn try_from(value: ParkingSpotRow) -> Result<Self, Self::Error> {
        let ParkingSpotRow {
            spot_id,
            spot_number,
            location,
            status,
        } = value;
        Ok(ParkingSpot {
            spot_id,
            spot_number,
            location,
            status: parse_column("parking_spots.status", &status)?,
        })
    }
}

#[derive(sqlx::FromRow)]
pub struct AssignmentRow {
    pub assignment_id: AssignmentId,
    pub resident_id: ResidentId,
    pub vehicle_id: VehicleId,
    pub spot_id: ParkingSpotId,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub payment_status: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<AssignmentRow> for ParkingAssignment {
    type Error = AppError;

    fn try_from(value: AssignmentRow) -> Result<Self, Self::Error> {
        let AssignmentRow {
            assignment_id,
            resident_id,
            vehicle_id,
            spot_id,
            start_date,
            end_date,
            payment_status,
            status,
            created_at,
        } = value;
        Ok(ParkingAssignment {
            assignment_id,
            resident_id,
            vehicle_id,
            spot_id,
            start_date,
            end_date,
            payment_status: parse_column("parking_assignments.payment_status", &payment_status)?,
            status: parse_column("parking_assignments.status", &status)?,
            created_at,
        })
    }
}

// 手動割り当て・取り消しの事前チェックで使う、割り当ての状態
#[derive(sqlx::FromRow)]
pub struct AssignmentStateRow {
    pub spot_id: ParkingSpotId,
    pub status: String,
}
