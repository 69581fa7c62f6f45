use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::ResidentId,
    resident::{
        event::{CreateResident, DeleteResident, UpdatePaymentStatus},
        Resident,
    },
};
use kernel::repository::resident::ResidentRepository;
use shared::error::{AppError, AppResult};

use super::is_unique_violation;
use crate::database::{lock_parking_mutations, model::resident::ResidentRow, ConnectionPool};

#[derive(new)]
pub struct ResidentRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl ResidentRepository for ResidentRepositoryImpl {
    async fn create(&self, event: CreateResident) -> AppResult<Resident> {
        let password_hash = bcrypt::hash(&event.password, bcrypt::DEFAULT_COST)?;

        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, ResidentRow>(
            r#"
                INSERT INTO residents
                (full_name, email, password_hash, phone, house_number,
                interior_number, role, payment_status)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING
                resident_id, full_name, email, phone, house_number,
                interior_number, role, payment_status, last_payment_date, created_at
            "#,
        )
        .bind(&event.full_name)
        .bind(&event.email)
        .bind(password_hash)
        .bind(&event.phone)
        .bind(&event.house_number)
        .bind(event.interior_number)
        .bind(event.role.as_ref())
        .bind(event.payment_status.as_ref())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::UnprocessableEntity(format!(
                    "メールアドレス（{}）はすでに使用されています。",
                    event.email
                ))
            } else {
                AppError::SpecificOperationError(e)
            }
        })?;

        // 車両情報が入力されている場合は同じトランザクションで登録する
        if let Some(vehicle) = &event.vehicle {
            sqlx::query(
                r#"
                    INSERT INTO vehicles
                    (resident_id, license_plate, brand, model, color, active)
                    VALUES ($1, $2, $3, $4, $5, TRUE)
                "#,
            )
            .bind(row.resident_id)
            .bind(&vehicle.license_plate)
            .bind(&vehicle.brand)
            .bind(&vehicle.model)
            .bind(&vehicle.color)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Resident::try_from(row)
    }

    async fn find_all(&self) -> AppResult<Vec<Resident>> {
        sqlx::query_as::<_, ResidentRow>(
            r#"
                SELECT
                resident_id, full_name, email, phone, house_number,
                interior_number, role, payment_status, last_payment_date, created_at
                FROM residents
                ORDER BY created_at ASC, resident_id ASC
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(Resident::try_from)
        .collect()
    }

    async fn find_by_id(&self, resident_id: ResidentId) -> AppResult<Option<Resident>> {
        sqlx::query_as::<_, ResidentRow>(
            r#"
                SELECT
                resident_id, full_name, email, phone, house_number,
                interior_number, role, payment_status, last_payment_date, created_at
                FROM residents
                WHERE resident_id = $1
            "#,
        )
        .bind(resident_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .map(Resident::try_from)
        .transpose()
    }

    async fn update_payment_status(&self, event: UpdatePaymentStatus) -> AppResult<()> {
        // 最終支払日は指定されたときだけ上書きする
        let res = sqlx::query(
            r#"
                UPDATE residents
                SET
                    payment_status = $2,
                    last_payment_date = COALESCE($3, last_payment_date)
                WHERE resident_id = $1
            "#,
        )
        .bind(event.resident_id)
        .bind(event.payment_status.as_ref())
        .bind(event.last_payment_date)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "居住者（{}）が見つかりませんでした。",
                event.resident_id
            )));
        }

        Ok(())
    }

    async fn delete(&self, event: DeleteResident) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        // ローテーションと同時に実行されると、削除した居住者にスペースが割り当てられうる
        lock_parking_mutations(&mut tx).await?;

        {
            let active = sqlx::query_scalar::<_, i64>(
                r#"
                    SELECT COUNT(*)
                    FROM parking_assignments
                    WHERE resident_id = $1 AND status = 'active'
                "#,
            )
            .bind(event.resident_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

            if active > 0 {
                return Err(AppError::UnprocessableEntity(format!(
                    "居住者（{}）には有効な駐車場の割り当てがあるため削除できません。",
                    event.resident_id
                )));
            }
        }

        let res = sqlx::query("DELETE FROM residents WHERE resident_id = $1")
            .bind(event.resident_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "居住者（{}）が見つかりませんでした。",
                event.resident_id
            )));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::model::{
        resident::PaymentStatus, role::Role, vehicle::event::NewVehicle,
    };

    fn create_event(email: &str, vehicle: Option<NewVehicle>) -> CreateResident {
        CreateResident {
            full_name: "Ana Gomez".into(),
            email: email.into(),
            password: "secret".into(),
            phone: "3001234567".into(),
            house_number: "12".into(),
            interior_number: 3,
            role: Role::Resident,
            payment_status: PaymentStatus::Current,
            vehicle,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_register_resident(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = ResidentRepositoryImpl::new(ConnectionPool::new(pool.clone()));

        let vehicle = NewVehicle::new("ABC123".into(), "Mazda".into(), "2".into(), "red".into());
        let created = repo
            .create(create_event("ana@example.com", Some(vehicle)))
            .await?;

        let found = repo.find_by_id(created.resident_id).await?;
        assert_eq!(found, Some(created.clone()));

        let vehicles: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM vehicles WHERE resident_id = $1")
                .bind(created.resident_id)
                .fetch_one(&pool)
                .await?;
        assert_eq!(vehicles, 1);

        // 同じメールアドレスは登録できない
        let res = repo.create(create_event("ana@example.com", None)).await;
        assert!(matches!(res, Err(AppError::UnprocessableEntity(_))));

        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_payment_status_and_delete(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = ResidentRepositoryImpl::new(ConnectionPool::new(pool));
        let created = repo.create(create_event("luis@example.com", None)).await?;

        repo.update_payment_status(UpdatePaymentStatus::new(
            created.resident_id,
            PaymentStatus::Overdue,
            None,
        ))
        .await?;
        let found = repo.find_by_id(created.resident_id).await?.unwrap();
        assert_eq!(found.payment_status, PaymentStatus::Overdue);

        repo.delete(DeleteResident::new(created.resident_id)).await?;
        assert!(repo.find_by_id(created.resident_id).await?.is_none());

        let res = repo.delete(DeleteResident::new(created.resident_id)).await;
        assert!(matches!(res, Err(AppError::EntityNotFound(_))));

        Ok(())
    }
}
