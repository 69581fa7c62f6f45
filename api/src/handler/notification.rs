use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::{
    id::NotificationId,
    notification::event::{CreateNotification, MarkNotificationRead},
};
use registry::AppRegistry;
use shared::error::AppResult;

use crate::{
    extractor::AuthorizedUser,
    model::notification::{
        CreateNotificationRequest, CreatedNotificationsResponse, NotificationsResponse,
    },
};

pub async fn send_notification(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateNotificationRequest>,
) -> AppResult<(StatusCode, Json<CreatedNotificationsResponse>)> {
    user.ensure_admin()?;
    req.validate(&())?;

    let created = registry
        .notification_repository()
        .create(CreateNotification::try_from(req)?)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedNotificationsResponse { created }),
    ))
}

pub async fn show_my_notifications(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<NotificationsResponse>> {
    registry
        .notification_repository()
        .find_by_resident_id(user.id())
        .await
        .map(NotificationsResponse::from)
        .map(Json)
}

pub async fn mark_as_read(
    user: AuthorizedUser,
    Path(notification_id): Path<NotificationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    registry
        .notification_repository()
        .mark_as_read(MarkNotificationRead::new(notification_id, user.id()))
        .await
        .map(|_| StatusCode::OK)
}
