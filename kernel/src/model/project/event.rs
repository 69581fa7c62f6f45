use crate::model::id::{ProjectId, QuoteId, ResidentId};
use chrono::{DateTime, Utc};
use derive_new::new;

use super::{ProjectPriority, ProjectStatus};

#[derive(Debug)]
pub struct CreateProject {
    pub title: String,
    pub description: String,
    pub justification: String,
    pub priority: ProjectPriority,
    pub viability: String,
    pub budget: i64,
    pub status: ProjectStatus,
    pub voting_deadline: Option<DateTime<Utc>>,
    pub created_by: ResidentId,
}

#[derive(Debug, new)]
pub struct UpdateProjectStatus {
    pub project_id: ProjectId,
    pub status: ProjectStatus,
}

#[derive(Debug)]
pub struct CreateQuote {
    pub project_id: ProjectId,
    pub provider_name: String,
    pub amount: i64,
    pub description: String,
    pub file_url: String,
    pub file_name: String,
}

#[derive(Debug, new)]
pub struct CastVote {
    pub project_id: ProjectId,
    pub resident_id: ResidentId,
    pub quote_id: QuoteId,
    pub voted_at: DateTime<Utc>,
}
