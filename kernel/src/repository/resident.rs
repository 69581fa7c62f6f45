use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    id::ResidentId,
    resident::{
        event::{CreateResident, DeleteResident, UpdatePaymentStatus},
        Resident,
    },
};

#[async_trait]
pub trait ResidentRepository: Send + Sync {
    // 居住者を登録する。車両情報があれば同じトランザクションで登録する
    async fn create(&self, event: CreateResident) -> AppResult<Resident>;
    async fn find_all(&self) -> AppResult<Vec<Resident>>;
    async fn find_by_id(&self, resident_id: ResidentId) -> AppResult<Option<Resident>>;
    async fn update_payment_status(&self, event: UpdatePaymentStatus) -> AppResult<()>;
    // 有効な駐車場の割り当てを持つ居住者は削除できない
    async fn delete(&self, event: DeleteResident) -> AppResult<()>;
}
