use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::{AssignmentId, ParkingSpotId, ResidentId, VehicleId},
    parking::{
        event::{AssignmentListOptions, CancelAssignment, CreateAssignment, CreateParkingSpot},
        AssignmentStatus, ParkingAssignment, ParkingSpot, SpotStatus,
    },
};
use kernel::repository::parking::ParkingRepository;
use shared::error::{AppError, AppResult};

use super::is_unique_violation;
use crate::database::{
    lock_parking_mutations,
    model::{
        parse_column,
        parking::{AssignmentRow, AssignmentStateRow, ParkingSpotRow},
    },
    ConnectionPool,
};

#[derive(new)]
pub struct ParkingRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl ParkingRepository for ParkingRepositoryImpl {
    async fn create_spot(&self, event: CreateParkingSpot) -> AppResult<ParkingSpotId> {
        let spot_id = ParkingSpotId::new();
        sqlx::query(
            r#"
                INSERT INTO parking_spots (spot_id, spot_number, location, status)
                VALUES ($1, $2, $3, 'available')
            "#,
        )
        .bind(spot_id)
        .bind(&event.spot_number)
        .bind(&event.location)
        .execute(self.db.inner_ref())
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::UnprocessableEntity(format!(
                    "駐車スペース（{}）はすでに登録されています。",
                    event.spot_number
                ))
            } else {
                AppError::SpecificOperationError(e)
            }
        })?;

        Ok(spot_id)
    }

    async fn find_spots(&self) -> AppResult<Vec<ParkingSpot>> {
        sqlx::query_as::<_, ParkingSpotRow>(
            r#"
                SELECT spot_id, spot_number, location, status
                FROM parking_spots
                ORDER BY spot_number ASC
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(ParkingSpot::try_from)
        .collect()
    }

    async fn find_assignments(
        &self,
        options: AssignmentListOptions,
    ) -> AppResult<Vec<ParkingAssignment>> {
        let AssignmentListOptions {
            status,
            resident_id,
        } = options;
        sqlx::query_as::<_, AssignmentRow>(
            r#"
                SELECT
                assignment_id, resident_id, vehicle_id, spot_id, start_date, end_date,
                payment_status, status, created_at
                FROM parking_assignments
                WHERE ($1::TEXT IS NULL OR status = $1)
                  AND ($2::UUID IS NULL OR resident_id = $2)
                ORDER BY created_at DESC
            "#,
        )
        .bind(status.map(|s| s.as_ref().to_owned()))
        .bind(resident_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(ParkingAssignment::try_from)
        .collect()
    }

    async fn create_assignment(&self, event: CreateAssignment) -> AppResult<AssignmentId> {
        let mut tx = self.db.begin().await?;

        lock_parking_mutations(&mut tx).await?;

        // 事前のチェックとして、以下を調べる。
        // - 居住者が存在し、有効な割り当てを持っていないか
        // - 車両がその居住者のもので、有効か
        // - スペースが存在し、空いているか
        {
            let resident = sqlx::query_scalar::<_, ResidentId>(
                "SELECT resident_id FROM residents WHERE resident_id = $1",
            )
            .bind(event.resident_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
            if resident.is_none() {
                return Err(AppError::EntityNotFound(format!(
                    "居住者（{}）が見つかりませんでした。",
                    event.resident_id
                )));
            }

            let held = sqlx::query_scalar::<_, AssignmentId>(
                r#"
                    SELECT assignment_id FROM parking_assignments
                    WHERE resident_id = $1 AND status = 'active'
                "#,
            )
            .bind(event.resident_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
            if held.is_some() {
                return Err(AppError::UnprocessableEntity(format!(
                    "居住者（{}）はすでに駐車スペースを割り当てられています。",
                    event.resident_id
                )));
            }

            let vehicle = sqlx::query_as::<_, (ResidentId, bool)>(
                "SELECT resident_id, active FROM vehicles WHERE vehicle_id = $1",
            )
            .bind(event.vehicle_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
            check_vehicle(event.vehicle_id, event.resident_id, vehicle)?;

            let spot_status = sqlx::query_scalar::<_, String>(
                "SELECT status FROM parking_spots WHERE spot_id = $1 FOR UPDATE",
            )
            .bind(event.spot_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
            let Some(spot_status) = spot_status else {
                return Err(AppError::EntityNotFound(format!(
                    "駐車スペース（{}）が見つかりませんでした。",
                    event.spot_id
                )));
            };
            let spot_status: SpotStatus = parse_column("parking_spots.status", &spot_status)?;
            if spot_status != SpotStatus::Available {
                return Err(AppError::UnprocessableEntity(format!(
                    "駐車スペース（{}）は空いていません。",
                    event.spot_id
                )));
            }
        }

        let assignment_id = AssignmentId::new();
        sqlx::query(
            r#"
                INSERT INTO parking_assignments
                (assignment_id, resident_id, vehicle_id, spot_id,
                start_date, end_date, payment_status, status)
                VALUES ($1, $2, $3, $4, $5, $6, $7, 'active')
            "#,
        )
        .bind(assignment_id)
        .bind(event.resident_id)
        .bind(event.vehicle_id)
        .bind(event.spot_id)
        .bind(event.start_date)
        .bind(event.end_date)
        .bind(event.payment_status.as_ref())
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let res = sqlx::query("UPDATE parking_spots SET status = 'occupied' WHERE spot_id = $1")
            .bind(event.spot_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No parking spot record has been updated".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(assignment_id)
    }

    async fn cancel_assignment(&self, event: CancelAssignment) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        lock_parking_mutations(&mut tx).await?;

        let state = sqlx::query_as::<_, AssignmentStateRow>(
            r#"
                SELECT spot_id, status
                FROM parking_assignments
                WHERE assignment_id = $1
                FOR UPDATE
            "#,
        )
        .bind(event.assignment_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some(state) = state else {
            return Err(AppError::EntityNotFound(format!(
                "割り当て（{}）が見つかりませんでした。",
                event.assignment_id
            )));
        };

        let status: AssignmentStatus = parse_column("parking_assignments.status", &state.status)?;
        if status != AssignmentStatus::Active {
            return Err(AppError::UnprocessableEntity(format!(
                "割り当て（{}）は有効ではありません（{}）。",
                event.assignment_id,
                status.as_ref()
            )));
        }

        sqlx::query(
            r#"
                UPDATE parking_assignments
                SET status = 'cancelled', end_date = $2
                WHERE assignment_id = $1
            "#,
        )
        .bind(event.assignment_id)
        .bind(event.cancelled_at)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        sqlx::query("UPDATE parking_spots SET status = 'available' WHERE spot_id = $1")
            .bind(state.spot_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }
}

fn check_vehicle(
    vehicle_id: VehicleId,
    resident_id: ResidentId,
    found: Option<(ResidentId, bool)>,
) -> AppResult<()> {
    match found {
        None => Err(AppError::EntityNotFound(format!(
            "車両（{vehicle_id}）が見つかりませんでした。"
        ))),
        Some((owner, _)) if owner != resident_id => Err(AppError::UnprocessableEntity(format!(
            "車両（{vehicle_id}）は居住者（{resident_id}）のものではありません。"
        ))),
        Some((_, false)) => Err(AppError::UnprocessableEntity(format!(
            "車両（{vehicle_id}）は無効になっています。"
        ))),
        Some(_) => Ok(()),
    }
}
