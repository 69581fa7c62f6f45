use crate::model::id::{AssignmentId, ParkingSpotId, ResidentId, VehicleId};
use chrono::{DateTime, Utc};
use derive_new::new;

use super::{AssignmentPaymentStatus, AssignmentStatus};

#[derive(Debug, new)]
pub struct CreateParkingSpot {
    pub spot_number: String,
    pub location: String,
}

#[derive(Debug, new)]
pub struct CreateAssignment {
    pub resident_id: ResidentId,
    pub vehicle_id: VehicleId,
    pub spot_id: ParkingSpotId,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub payment_status: AssignmentPaymentStatus,
}

#[derive(Debug, new)]
pub struct CancelAssignment {
    pub assignment_id: AssignmentId,
    pub cancelled_at: DateTime<Utc>,
}

#[derive(Debug, Default, new)]
pub struct AssignmentListOptions {
    pub status: Option<AssignmentStatus>,
    pub resident_id: Option<ResidentId>,
}
