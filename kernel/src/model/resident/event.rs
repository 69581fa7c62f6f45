use crate::model::{id::ResidentId, role::Role, vehicle::event::NewVehicle};
use chrono::{DateTime, Utc};
use derive_new::new;

use super::PaymentStatus;

#[derive(Debug)]
pub struct CreateResident {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub house_number: String,
    pub interior_number: i32,
    pub role: Role,
    pub payment_status: PaymentStatus,
    pub vehicle: Option<NewVehicle>,
}

#[derive(Debug, new)]
pub struct UpdatePaymentStatus {
    pub resident_id: ResidentId,
    pub payment_status: PaymentStatus,
    pub last_payment_date: Option<DateTime<Utc>>,
}

#[derive(Debug, new)]
pub struct DeleteResident {
    pub resident_id: ResidentId,
}
