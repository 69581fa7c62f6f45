use crate::model::{
    id::{NotificationId, ResidentId},
    role::Role,
};
use derive_new::new;

use super::NotificationKind;

/// 通知の宛先
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// ロールが居住者のユーザー全員
    AllResidents,
    Role(Role),
    Specific(ResidentId),
}

#[derive(Debug, new)]
pub struct CreateNotification {
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub audience: Audience,
}

#[derive(Debug, new)]
pub struct MarkNotificationRead {
    pub notification_id: NotificationId,
    pub resident_id: ResidentId,
}
