use async_trait::async_trait;
use chrono::{DateTime, Utc};
use derive_new::new;
use kernel::model::{
    parking::{ParkingAssignment, ParkingSpot},
    resident::Resident,
    rotation::{RotationPlan, RotationPolicy, RotationSnapshot, RotationSummary},
    vehicle::Vehicle,
};
use kernel::repository::rotation::RotationRepository;
use shared::error::{AppError, AppResult};
use sqlx::{Postgres, Transaction};

use crate::database::{
    lock_parking_mutations,
    model::{
        parking::{AssignmentRow, ParkingSpotRow},
        resident::ResidentRow,
        vehicle::VehicleRow,
    },
    ConnectionPool,
};

#[derive(new)]
pub struct RotationRepositoryImpl {
    db: ConnectionPool,
    policy: RotationPolicy,
}

#[async_trait]
impl RotationRepository for RotationRepositoryImpl {
    async fn rotate(&self, now: DateTime<Utc>) -> AppResult<RotationSummary> {
        let mut tx = self.db.begin().await?;

        // 別のローテーションや手動割り当てと同時に実行されないようにする
        lock_parking_mutations(&mut tx).await?;

        let snapshot = load_snapshot(&mut tx).await?;
        let plan = RotationPlan::build(&snapshot, &self.policy, now);

        if !plan.is_empty() {
            apply_plan(&mut tx, &plan).await?;
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        let summary = plan.summary();
        tracing::info!(
            removed = summary.removed,
            assigned = summary.assigned,
            waiting = summary.waiting,
            "parking rotation finished"
        );

        Ok(summary)
    }
}

async fn load_snapshot(tx: &mut Transaction<'_, Postgres>) -> AppResult<RotationSnapshot> {
    let residents = sqlx::query_as::<_, ResidentRow>(
        r#"
            SELECT
            resident_id, full_name, email, phone, house_number,
            interior_number, role, payment_status, last_payment_date, created_at
            FROM residents
            WHERE role = 'resident'
            ORDER BY created_at ASC, resident_id ASC
        "#,
    )
    .fetch_all(&mut **tx)
    .await
    .map_err(AppError::SpecificOperationError)?
    .into_iter()
    .map(Resident::try_from)
    .collect::<AppResult<Vec<_>>>()?;

    let active_vehicles = sqlx::query_as::<_, VehicleRow>(
        r#"
            SELECT
            vehicle_id, resident_id, license_plate, brand, model, color, active, created_at
            FROM vehicles
            WHERE active = TRUE
            ORDER BY created_at ASC, vehicle_id ASC
        "#,
    )
    .fetch_all(&mut **tx)
    .await
    .map_err(AppError::SpecificOperationError)?
    .into_iter()
    .map(Vehicle::from)
    .collect();

    let available_spots = sqlx::query_as::<_, ParkingSpotRow>(
        r#"
            SELECT spot_id, spot_number, location, status
            FROM parking_spots
            WHERE status = 'available'
            ORDER BY spot_number ASC
            FOR UPDATE
        "#,
    )
    .fetch_all(&mut **tx)
    .await
    .map_err(AppError::SpecificOperationError)?
    .into_iter()
    .map(ParkingSpot::try_from)
    .collect::<AppResult<Vec<_>>>()?;

    let history = sqlx::query_as::<_, AssignmentRow>(
        r#"
            SELECT
            assignment_id, resident_id, vehicle_id, spot_id, start_date, end_date,
            payment_status, status, created_at
            FROM parking_assignments
            ORDER BY created_at ASC
        "#,
    )
    .fetch_all(&mut **tx)
    .await
    .map_err(AppError::SpecificOperationError)?
    .into_iter()
    .map(ParkingAssignment::try_from)
    .collect::<AppResult<Vec<_>>>()?;

    let active_assignments = history.iter().filter(|a| a.is_active()).cloned().collect();

    Ok(RotationSnapshot {
        residents,
        active_vehicles,
        active_assignments,
        available_spots,
        history,
    })
}

// 解除を先に反映してから付与する。部分一意インデックスに引っかからないようにするため
async fn apply_plan(tx: &mut Transaction<'_, Postgres>, plan: &RotationPlan) -> AppResult<()> {
    for expiration in &plan.expirations {
        let res = sqlx::query(
            r#"
                UPDATE parking_assignments
                SET status = 'expired', end_date = $2
                WHERE assignment_id = $1 AND status = 'active'
            "#,
        )
        .bind(expiration.assignment_id)
        .bind(plan.executed_at)
        .execute(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?;
        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(format!(
                "No parking assignment record has been expired ({})",
                expiration.assignment_id
            )));
        }

        let res = sqlx::query("UPDATE parking_spots SET status = 'available' WHERE spot_id = $1")
            .bind(expiration.spot_id)
            .execute(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(format!(
                "No parking spot record has been released ({})",
                expiration.spot_id
            )));
        }
    }

    for grant in &plan.grants {
        sqlx::query(
            r#"
                INSERT INTO parking_assignments
                (resident_id, vehicle_id, spot_id, start_date, end_date, payment_status, status)
                VALUES ($1, $2, $3, $4, $5, $6, 'active')
            "#,
        )
        .bind(grant.resident_id)
        .bind(grant.vehicle_id)
        .bind(grant.spot_id)
        .bind(grant.start_date)
        .bind(grant.end_date)
        .bind(grant.payment_status.as_ref())
        .execute(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let res = sqlx::query("UPDATE parking_spots SET status = 'occupied' WHERE spot_id = $1")
            .bind(grant.spot_id)
            .execute(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(format!(
                "No parking spot record has been occupied ({})",
                grant.spot_id
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use kernel::model::{
        id::{ParkingSpotId, ResidentId, VehicleId},
        parking::{AssignmentStatus, SpotStatus},
    };

    async fn seed_resident(pool: &sqlx::PgPool, email: &str, status: &str) -> (ResidentId, VehicleId) {
        let resident_id: ResidentId = sqlx::query_scalar(
            r#"
                INSERT INTO residents
                (full_name, email, password_hash, phone, house_number, interior_number, role, payment_status)
                VALUES ('Resident', $1, 'x', '3001234567', '1', 1, 'resident', $2)
                RETURNING resident_id
            "#,
        )
        .bind(email)
        .bind(status)
        .fetch_one(pool)
        .await
        .unwrap();
        let vehicle_id: VehicleId = sqlx::query_scalar(
            r#"
                INSERT INTO vehicles (resident_id, license_plate, brand, model, color)
                VALUES ($1, 'ABC123', 'Mazda', '2', 'red')
                RETURNING vehicle_id
            "#,
        )
        .bind(resident_id)
        .fetch_one(pool)
        .await
        .unwrap();
        (resident_id, vehicle_id)
    }

    async fn seed_spot(pool: &sqlx::PgPool, number: &str, status: &str) -> ParkingSpotId {
        sqlx::query_scalar(
            "INSERT INTO parking_spots (spot_number, location, status) VALUES ($1, 'S1', $2) RETURNING spot_id",
        )
        .bind(number)
        .bind(status)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    async fn assignments_of(pool: &sqlx::PgPool, resident_id: ResidentId) -> Vec<ParkingAssignment> {
        sqlx::query_as::<_, AssignmentRow>(
            r#"
                SELECT
                assignment_id, resident_id, vehicle_id, spot_id, start_date, end_date,
                payment_status, status, created_at
                FROM parking_assignments
                WHERE resident_id = $1
                ORDER BY created_at ASC
            "#,
        )
        .bind(resident_id)
        .fetch_all(pool)
        .await
        .unwrap()
        .into_iter()
        .map(|row| ParkingAssignment::try_from(row).unwrap())
        .collect()
    }

    async fn seed_assignment(
        pool: &sqlx::PgPool,
        (resident_id, vehicle_id): (ResidentId, VehicleId),
        spot_id: ParkingSpotId,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        status: &str,
    ) {
        sqlx::query(
            r#"
                INSERT INTO parking_assignments
                (resident_id, vehicle_id, spot_id, start_date, end_date, payment_status, status)
                VALUES ($1, $2, $3, $4, $5, 'paid', $6)
            "#,
        )
        .bind(resident_id)
        .bind(vehicle_id)
        .bind(spot_id)
        .bind(start_date)
        .bind(end_date)
        .bind(status)
        .execute(pool)
        .await
        .unwrap();
    }

    async fn spot_status(pool: &sqlx::PgPool, spot_id: ParkingSpotId) -> String {
        sqlx::query_scalar("SELECT status FROM parking_spots WHERE spot_id = $1")
            .bind(spot_id)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_rotation_expires_and_reassigns(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = RotationRepositoryImpl::new(
            ConnectionPool::new(pool.clone()),
            RotationPolicy::default(),
        );
        let now = Utc::now();

        // A は 100 日前からスペース P01 を使っている
        let a = seed_resident(&pool, "a@example.com", "current").await;
        let p01 = seed_spot(&pool, "P01", "occupied").await;
        seed_assignment(
            &pool,
            a,
            p01,
            now - Duration::days(100),
            now - Duration::days(10),
            "active",
        )
        .await;

        // B は 60 日前に前回の割り当てが終わっている
        let b = seed_resident(&pool, "b@example.com", "current").await;
        seed_assignment(
            &pool,
            b,
            p01,
            now - Duration::days(150),
            now - Duration::days(60),
            "expired",
        )
        .await;

        let (c, _) = seed_resident(&pool, "c@example.com", "overdue").await;

        let summary = repo.rotate(now).await?;
        assert_eq!(
            summary,
            RotationSummary {
                removed: 1,
                assigned: 1,
                waiting: 1
            }
        );

        let a_history = assignments_of(&pool, a.0).await;
        assert_eq!(a_history.len(), 1);
        assert_eq!(a_history[0].status, AssignmentStatus::Expired);

        let b_history = assignments_of(&pool, b.0).await;
        assert_eq!(b_history.len(), 2);
        assert_eq!(b_history[1].status, AssignmentStatus::Active);
        assert_eq!(b_history[1].spot_id, p01);

        // 支払いが滞っている居住者は対象外
        assert!(assignments_of(&pool, c).await.is_empty());

        assert_eq!(spot_status(&pool, p01).await, SpotStatus::Occupied.as_ref());

        // 直後に再実行しても何も変わらない
        let summary = repo.rotate(now).await?;
        assert_eq!(
            summary,
            RotationSummary {
                removed: 0,
                assigned: 0,
                waiting: 1
            }
        );

        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_concurrent_rotations_grant_each_spot_once(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let repo = RotationRepositoryImpl::new(
            ConnectionPool::new(pool.clone()),
            RotationPolicy::default(),
        );
        let now = Utc::now();

        let (r, _) = seed_resident(&pool, "r@example.com", "current").await;
        let p01 = seed_spot(&pool, "P01", "available").await;

        // ロックで直列化されるので、後から走った方は何もしない
        let (first, second) = tokio::join!(repo.rotate(now), repo.rotate(now));
        let (first, second) = (first?, second?);
        assert_eq!(first.assigned + second.assigned, 1);
        assert_eq!(first.removed + second.removed, 0);

        let active: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM parking_assignments WHERE status = 'active'")
                .fetch_one(&pool)
                .await?;
        assert_eq!(active, 1);

        let history = assignments_of(&pool, r).await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].spot_id, p01);
        assert_eq!(spot_status(&pool, p01).await, SpotStatus::Occupied.as_ref());

        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_failed_rotation_leaves_assignments_untouched(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let repo = RotationRepositoryImpl::new(
            ConnectionPool::new(pool.clone()),
            RotationPolicy::default(),
        );
        let now = Utc::now();

        let a = seed_resident(&pool, "a@example.com", "current").await;
        let p01 = seed_spot(&pool, "P01", "occupied").await;
        let started = now - Duration::days(100);
        let ends = now - Duration::days(10);
        seed_assignment(&pool, a, p01, started, ends, "active").await;
        let (b, _) = seed_resident(&pool, "b@example.com", "current").await;

        // 解除の UPDATE は通り、付与の INSERT で失敗させる
        sqlx::query(
            r#"
                CREATE FUNCTION reject_assignment_insert() RETURNS trigger AS $$
                BEGIN
                    RAISE EXCEPTION 'parking_assignments is read only';
                END;
                $$ LANGUAGE plpgsql
            "#,
        )
        .execute(&pool)
        .await?;
        sqlx::query(
            r#"
                CREATE TRIGGER reject_assignment_insert
                BEFORE INSERT ON parking_assignments
                FOR EACH ROW EXECUTE FUNCTION reject_assignment_insert()
            "#,
        )
        .execute(&pool)
        .await?;

        let res = repo.rotate(now).await;
        assert!(matches!(res, Err(AppError::SpecificOperationError(_))));

        let a_history = assignments_of(&pool, a.0).await;
        assert_eq!(a_history.len(), 1);
        assert_eq!(a_history[0].status, AssignmentStatus::Active);
        assert_eq!(a_history[0].end_date.timestamp_micros(), ends.timestamp_micros());
        assert!(assignments_of(&pool, b).await.is_empty());
        assert_eq!(spot_status(&pool, p01).await, SpotStatus::Occupied.as_ref());

        Ok(())
    }
}
