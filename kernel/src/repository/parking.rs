use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    id::{AssignmentId, ParkingSpotId},
    parking::{
        event::{AssignmentListOptions, CancelAssignment, CreateAssignment, CreateParkingSpot},
        ParkingAssignment, ParkingSpot,
    },
};

#[async_trait]
pub trait ParkingRepository: Send + Sync {
    async fn create_spot(&self, event: CreateParkingSpot) -> AppResult<ParkingSpotId>;
    async fn find_spots(&self) -> AppResult<Vec<ParkingSpot>>;
    async fn find_assignments(
        &self,
        options: AssignmentListOptions,
    ) -> AppResult<Vec<ParkingAssignment>>;
    // 管理者による手動の割り当て。スペースは occupied になる
    async fn create_assignment(&self, event: CreateAssignment) -> AppResult<AssignmentId>;
    // 有効な割り当てを取り消し、スペースを available に戻す
    async fn cancel_assignment(&self, event: CancelAssignment) -> AppResult<()>;
}
