use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::{NotificationId, ResidentId},
    notification::{
        event::{Audience, CreateNotification, MarkNotificationRead},
        Notification,
    },
};
use kernel::repository::notification::NotificationRepository;
use shared::error::{AppError, AppResult};

use crate::database::{model::notification::NotificationRow, ConnectionPool};

#[derive(new)]
pub struct NotificationRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl NotificationRepository for NotificationRepositoryImpl {
    async fn create(&self, event: CreateNotification) -> AppResult<usize> {
        let mut tx = self.db.begin().await?;

        let recipients: Vec<ResidentId> = match event.audience {
            Audience::AllResidents => sqlx::query_scalar(
                "SELECT resident_id FROM residents WHERE role = 'resident'",
            )
            .fetch_all(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?,
            Audience::Role(role) => {
                sqlx::query_scalar("SELECT resident_id FROM residents WHERE role = $1")
                    .bind(role.as_ref())
                    .fetch_all(&mut *tx)
                    .await
                    .map_err(AppError::SpecificOperationError)?
            }
            Audience::Specific(resident_id) => {
                sqlx::query_scalar("SELECT resident_id FROM residents WHERE resident_id = $1")
                    .bind(resident_id)
                    .fetch_all(&mut *tx)
                    .await
                    .map_err(AppError::SpecificOperationError)?
            }
        };

        if let Audience::Specific(resident_id) = event.audience {
            if recipients.is_empty() {
                return Err(AppError::EntityNotFound(format!(
                    "居住者（{resident_id}）が見つかりませんでした。"
                )));
            }
        }

        for resident_id in &recipients {
            sqlx::query(
                r#"
                    INSERT INTO notifications (resident_id, title, message, kind)
                    VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(resident_id)
            .bind(&event.title)
            .bind(&event.message)
            .bind(event.kind.as_ref())
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(recipients.len())
    }

    async fn find_by_resident_id(&self, resident_id: ResidentId) -> AppResult<Vec<Notification>> {
        sqlx::query_as::<_, NotificationRow>(
            r#"
                SELECT notification_id, resident_id, title, message, kind, read, created_at
                FROM notifications
                WHERE resident_id = $1
                ORDER BY created_at DESC
            "#,
        )
        .bind(resident_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(Notification::try_from)
        .collect()
    }

    async fn mark_as_read(&self, event: MarkNotificationRead) -> AppResult<()> {
        let owner = sqlx::query_scalar::<_, ResidentId>(
            "SELECT resident_id FROM notifications WHERE notification_id = $1",
        )
        .bind(event.notification_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        check_owner(event.notification_id, event.resident_id, owner)?;

        sqlx::query("UPDATE notifications SET read = TRUE WHERE notification_id = $1")
            .bind(event.notification_id)
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        Ok(())
    }
}

fn check_owner(
    notification_id: NotificationId,
    caller: ResidentId,
    owner: Option<ResidentId>,
) -> AppResult<()> {
    match owner {
        None => Err(AppError::EntityNotFound(format!(
            "通知（{notification_id}）が見つかりませんでした。"
        ))),
        Some(owner) if owner != caller => Err(AppError::ForbiddenOperation),
        Some(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::model::{notification::NotificationKind, role::Role};

    #[test]
    fn only_the_recipient_can_mark_as_read() {
        let (id, me, other) = (NotificationId::new(), ResidentId::new(), ResidentId::new());
        assert!(check_owner(id, me, Some(me)).is_ok());
        assert!(matches!(
            check_owner(id, me, Some(other)),
            Err(AppError::ForbiddenOperation)
        ));
        assert!(matches!(
            check_owner(id, me, None),
            Err(AppError::EntityNotFound(_))
        ));
    }

    async fn seed(pool: &sqlx::PgPool, email: &str, role: Role) -> ResidentId {
        sqlx::query_scalar(
            r#"
                INSERT INTO residents
                (full_name, email, password_hash, phone, house_number, interior_number, role)
                VALUES ('User', $1, 'x', '3001234567', '1', 1, $2)
                RETURNING resident_id
            "#,
        )
        .bind(email)
        .bind(role.as_ref())
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_notify_residents(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = NotificationRepositoryImpl::new(ConnectionPool::new(pool.clone()));
        let admin = seed(&pool, "admin@example.com", Role::Admin).await;
        let ana = seed(&pool, "ana@example.com", Role::Resident).await;
        let luis = seed(&pool, "luis@example.com", Role::Resident).await;

        let created = repo
            .create(CreateNotification::new(
                "Parking".into(),
                "Rotation finished".into(),
                NotificationKind::Parking,
                Audience::AllResidents,
            ))
            .await?;
        assert_eq!(created, 2);
        assert!(repo.find_by_resident_id(admin).await?.is_empty());

        let inbox = repo.find_by_resident_id(ana).await?;
        assert_eq!(inbox.len(), 1);
        assert!(!inbox[0].read);

        let res = repo
            .mark_as_read(MarkNotificationRead::new(inbox[0].notification_id, luis))
            .await;
        assert!(matches!(res, Err(AppError::ForbiddenOperation)));

        repo.mark_as_read(MarkNotificationRead::new(inbox[0].notification_id, ana))
            .await?;
        assert!(repo.find_by_resident_id(ana).await?[0].read);

        Ok(())
    }
}
