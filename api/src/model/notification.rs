use chrono::{DateTime, Utc};
use garde::Validate;
use kernel::model::{
    id::{NotificationId, ResidentId},
    notification::{
        event::{Audience, CreateNotification},
        Notification, NotificationKind,
    },
    role::Role,
};
use serde::{Deserialize, Serialize};

use super::define_name_enum;

define_name_enum!(NotificationKindName, NotificationKind, [Parking, Project, General, Payment]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudienceName {
    All,
    Resident,
    Admin,
    Specific,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotificationRequest {
    #[garde(length(min = 1))]
    pub title: String,
    #[garde(length(min = 1))]
    pub message: String,
    #[garde(skip)]
    pub kind: NotificationKindName,
    #[garde(custom(requires_user_id(&self.user_id)))]
    pub audience: AudienceName,
    #[garde(skip)]
    pub user_id: Option<ResidentId>,
}

// 個別の宛先を指定するときはユーザー ID が必須
fn requires_user_id(
    user_id: &Option<ResidentId>,
) -> impl FnOnce(&AudienceName, &()) -> garde::Result + '_ {
    move |audience, _| {
        if *audience == AudienceName::Specific && user_id.is_none() {
            return Err(garde::Error::new("宛先のユーザーを指定してください。"));
        }
        Ok(())
    }
}

impl TryFrom<CreateNotificationRequest> for CreateNotification {
    type Error = shared::error::AppError;

    fn try_from(value: CreateNotificationRequest) -> Result<Self, Self::Error> {
        let CreateNotificationRequest {
            title,
            message,
            kind,
            audience,
            user_id,
        } = value;
        let audience = match (audience, user_id) {
            (AudienceName::All, _) => Audience::AllResidents,
            (AudienceName::Resident, _) => Audience::Role(Role::Resident),
            (AudienceName::Admin, _) => Audience::Role(Role::Admin),
            (AudienceName::Specific, Some(user_id)) => Audience::Specific(user_id),
            (AudienceName::Specific, None) => {
                return Err(shared::error::AppError::UnprocessableEntity(
                    "宛先のユーザーを指定してください。".into(),
                ))
            }
        };
        Ok(CreateNotification::new(title, message, kind.into(), audience))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedNotificationsResponse {
    pub created: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub notification_id: NotificationId,
    pub title: String,
    pub message: String,
    pub kind: NotificationKindName,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationResponse {
    fn from(value: Notification) -> Self {
        let Notification {
            notification_id,
            title,
            message,
            kind,
            read,
            created_at,
            ..
        } = value;
        Self {
            notification_id,
            title,
            message,
            kind: kind.into(),
            read,
            created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationsResponse {
    pub items: Vec<NotificationResponse>,
}

impl From<Vec<Notification>> for NotificationsResponse {
    fn from(value: Vec<Notification>) -> Self {
        Self {
            items: value.into_iter().map(NotificationResponse::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(audience: &str, user_id: Option<ResidentId>) -> CreateNotificationRequest {
        serde_json::from_value(json!({
            "title": "Parking",
            "message": "Rotation finished",
            "kind": "parking",
            "audience": audience,
            "userId": user_id,
        }))
        .unwrap()
    }

    #[test]
    fn specific_audience_requires_a_user() {
        assert!(request("specific", None).validate(&()).is_err());

        let user_id = ResidentId::new();
        let req = request("specific", Some(user_id));
        assert!(req.validate(&()).is_ok());
        let event = CreateNotification::try_from(req).unwrap();
        assert_eq!(event.audience, Audience::Specific(user_id));
    }

    #[test]
    fn audience_names_map_to_recipients() {
        let event = CreateNotification::try_from(request("all", None)).unwrap();
        assert_eq!(event.audience, Audience::AllResidents);
        let event = CreateNotification::try_from(request("admin", None)).unwrap();
        assert_eq!(event.audience, Audience::Role(Role::Admin));
        assert_eq!(event.kind, NotificationKind::Parking);
    }
}
