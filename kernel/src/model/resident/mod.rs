use crate::model::{id::ResidentId, role::Role};
use chrono::{DateTime, Utc};
use strum::{AsRefStr, EnumString};

pub mod event;

/// 管理費の支払い状況
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum PaymentStatus {
    Current,
    Overdue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resident {
    pub resident_id: ResidentId,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub house_number: String,
    pub interior_number: i32,
    pub role: Role,
    pub payment_status: PaymentStatus,
    pub last_payment_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Resident {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_current(&self) -> bool {
        self.payment_status == PaymentStatus::Current
    }
}
