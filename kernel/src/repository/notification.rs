use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    id::ResidentId,
    notification::{
        event::{CreateNotification, MarkNotificationRead},
        Notification,
    },
};

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    // 宛先ごとに 1 件ずつ作成し、作成件数を返す
    async fn create(&self, event: CreateNotification) -> AppResult<usize>;
    async fn find_by_resident_id(&self, resident_id: ResidentId) -> AppResult<Vec<Notification>>;
    async fn mark_as_read(&self, event: MarkNotificationRead) -> AppResult<()>;
}
