use kernel::model::{id::ResidentId, resident::Resident};
use shared::error::AppError;
use sqlx::types::chrono::{DateTime, Utc};

use super::parse_column;

#[derive(sqlx::FromRow)]
pub struct ResidentRow {
    pub resident_id: ResidentId,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub house_number: String,
    pub interior_number: i32,
    pub role: String,
    pub payment_status: String,
    pub last_payment_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ResidentRow> for Resident {
    type Error = AppError;

    fn try_from(value: ResidentRow) -> Result<Self, Self::Error> {
        let ResidentRow {
            resident_id,
            full_name,
            email,
            phone,
            house_number,
            interior_number,
            role,
            payment_status,
            last_payment_date,
            created_at,
        } = value;
        Ok(Resident {
            resident_id,
            full_name,
            email,
            phone,
            house_number,
            interior_number,
            role: parse_column("residents.role", &role)?,
            payment_status: parse_column("residents.payment_status", &payment_status)?,
            last_payment_date,
            created_at,
        })
    }
}
