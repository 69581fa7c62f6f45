use kernel::model::{
    id::{NotificationId, ResidentId},
    notification::Notification,
};
use shared::error::AppError;
use sqlx::types::chrono::{DateTime, Utc};

use super::parse_column;

#[derive(sqlx::FromRow)]
pub struct NotificationRow {
    pub notification_id: NotificationId,
    pub resident_id: ResidentId,
    pub title: String,
    pub message: String,
    pub kind: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = AppError;

    fn try_from(value: NotificationRow) -> Result<Self, Self::Error> {
        let NotificationRow {
            notification_id,
            resident_id,
            title,
            message,
            kind,
            read,
            created_at,
        } = value;
        Ok(Notification {
            notification_id,
            resident_id,
            title,
            message,
            kind: parse_column("notifications.kind", &kind)?,
            read,
            created_at,
        })
    }
}
