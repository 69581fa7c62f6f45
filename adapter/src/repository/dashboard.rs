use async_trait::async_trait;
use derive_new::new;
use kernel::model::dashboard::DashboardSummary;
use kernel::repository::dashboard::DashboardRepository;
use shared::error::{AppError, AppResult};

use crate::database::{model::dashboard::DashboardRow, ConnectionPool};

#[derive(new)]
pub struct DashboardRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl DashboardRepository for DashboardRepositoryImpl {
    async fn summarize(&self) -> AppResult<DashboardSummary> {
        sqlx::query_as::<_, DashboardRow>(
            r#"
                SELECT
                (SELECT COUNT(*) FROM residents WHERE role = 'resident') AS total_residents,
                (SELECT COUNT(*) FROM community_projects
                  WHERE status IN ('proposal', 'voting')) AS active_projects,
                (SELECT COUNT(*) FROM parking_spots WHERE status = 'occupied') AS occupied_spots,
                (SELECT COUNT(*) FROM parking_assignments
                  WHERE status = 'active' AND payment_status = 'unpaid') AS unpaid_assignments
            "#,
        )
        .fetch_one(self.db.inner_ref())
        .await
        .map(DashboardSummary::from)
        .map_err(AppError::SpecificOperationError)
    }
}
