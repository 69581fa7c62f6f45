use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::dashboard::DashboardSummary;

#[async_trait]
pub trait DashboardRepository: Send + Sync {
    async fn summarize(&self) -> AppResult<DashboardSummary>;
}
