use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::error::AppResult;

use crate::model::rotation::RotationSummary;

#[async_trait]
pub trait RotationRepository: Send + Sync {
    // 期限切れの割り当てを解除し、空いたスペースを待機中の居住者に割り当てる。
    // 読み出しから書き込みまでを 1 つのトランザクションで行い、途中で失敗した場合は何も反映しない
    async fn rotate(&self, now: DateTime<Utc>) -> AppResult<RotationSummary>;
}
