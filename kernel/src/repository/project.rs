use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    id::{ProjectId, QuoteId, VoteId},
    project::{
        event::{CastVote, CreateProject, CreateQuote, UpdateProjectStatus},
        CommunityProject, ProjectDetail,
    },
};

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn create(&self, event: CreateProject) -> AppResult<ProjectId>;
    async fn find_all(&self) -> AppResult<Vec<CommunityProject>>;
    async fn find_by_id(&self, project_id: ProjectId) -> AppResult<Option<ProjectDetail>>;
    async fn update_status(&self, event: UpdateProjectStatus) -> AppResult<()>;
    async fn add_quote(&self, event: CreateQuote) -> AppResult<QuoteId>;
    // 投票は 1 プロジェクトにつき 1 人 1 票
    async fn cast_vote(&self, event: CastVote) -> AppResult<VoteId>;
}
