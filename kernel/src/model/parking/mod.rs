use crate::model::id::{AssignmentId, ParkingSpotId, ResidentId, VehicleId};
use chrono::{DateTime, Utc};
use strum::{AsRefStr, EnumString};

pub mod event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum SpotStatus {
    Available,
    Occupied,
    Assigned,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParkingSpot {
    pub spot_id: ParkingSpotId,
    pub spot_number: String,
    pub location: String,
    pub status: SpotStatus,
}

// active からは expired（ローテーションによる期限切れ）か
// cancelled（管理者による手動取消）にのみ遷移する
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum AssignmentStatus {
    Active,
    Expired,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum AssignmentPaymentStatus {
    Paid,
    Unpaid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParkingAssignment {
    pub assignment_id: AssignmentId,
    pub resident_id: ResidentId,
    pub vehicle_id: VehicleId,
    pub spot_id: ParkingSpotId,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub payment_status: AssignmentPaymentStatus,
    pub status: AssignmentStatus,
    pub created_at: DateTime<Utc>,
}

impl ParkingAssignment {
    pub fn is_active(&self) -> bool {
        self.status == AssignmentStatus::Active
    }
}
