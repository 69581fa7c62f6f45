use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::{ResidentId, VehicleId},
    vehicle::{
        event::{CreateVehicle, UpdateVehicleActive},
        Vehicle,
    },
};
use kernel::repository::vehicle::VehicleRepository;
use shared::error::{AppError, AppResult};

use crate::database::{model::vehicle::VehicleRow, ConnectionPool};

#[derive(new)]
pub struct VehicleRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl VehicleRepository for VehicleRepositoryImpl {
    async fn create(&self, event: CreateVehicle) -> AppResult<VehicleId> {
        let mut tx = self.db.begin().await?;

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
        }

        let vehicle_id = VehicleId::new();
        let res = sqlx::query(
            r#"
                INSERT INTO vehicles
                (vehicle_id, resident_id, license_plate, brand, model, color, active)
                VALUES ($1, $2, $3, $4, $5, $6, TRUE)
            "#,
        )
        .bind(vehicle_id)
        .bind(event.resident_id)
        .bind(&event.vehicle.license_plate)
        .bind(&event.vehicle.brand)
        .bind(&event.vehicle.model)
        .bind(&event.vehicle.color)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No vehicle record has been created".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(vehicle_id)
    }

    async fn find_by_resident_id(&self, resident_id: ResidentId) -> AppResult<Vec<Vehicle>> {
        sqlx::query_as::<_, VehicleRow>(
            r#"
                SELECT
                vehicle_id, resident_id, license_plate, brand, model, color, active, created_at
                FROM vehicles
                WHERE resident_id = $1
                ORDER BY created_at ASC
            "#,
        )
        .bind(resident_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map(|rows| rows.into_iter().map(Vehicle::from).collect())
        .map_err(AppError::SpecificOperationError)
    }

    async fn update_active(&self, event: UpdateVehicleActive) -> AppResult<()> {
        let res = sqlx::query("UPDATE vehicles SET active = $2 WHERE vehicle_id = $1")
            .bind(event.vehicle_id)
            .bind(event.active)
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "車両（{}）が見つかりませんでした。",
                event.vehicle_id
            )));
        }

        Ok(())
    }
}
