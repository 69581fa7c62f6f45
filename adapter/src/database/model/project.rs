use kernel::model::{
    id::{ProjectId, QuoteId, ResidentId},
    project::{CommunityProject, ProjectQuote, QuoteTally},
};
use shared::error::AppError;
use sqlx::types::chrono::{DateTime, Utc};

use super::parse_column;

#[derive(sqlx::FromRow)]
pub struct ProjectRow {
    pub project_id: ProjectId,
    pub title: String,
    pub description: String,
    pub justification: String,
    pub priority: String,
    pub viability: String,
    pub budget: i64,
    pub status: String,
    pub voting_deadline: Option<DateTime<Utc>>,
    pub created_by: ResidentId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ProjectRow> for CommunityProject {
    type Error = AppError;

    fn try_from(value: ProjectRow) -> Result<Self, Self::Error> {
        let ProjectRow {
            project_id,
            title,
            description,
            justification,
            priority,
            viability,
            budget,
            status,
            voting_deadline,
            created_by,
            created_at,
            updated_at,
        } = value;
        Ok(CommunityProject {
            project_id,
            title,
            description,
            justification,
            priority: parse_column("community_projects.priority", &priority)?,
            viability,
            budget,
            status: parse_column("community_projects.status", &status)?,
            voting_deadline,
            created_by,
            created_at,
            updated_at,
        })
    }
}

// 見積もりと、その見積もりへの得票数
#[derive(sqlx::FromRow)]
pub struct QuoteTallyRow {
    pub quote_id: QuoteId,
    pub project_id: ProjectId,
    pub provider_name: String,
    pub amount: i64,
    pub description: String,
    pub file_url: String,
    pub file_name: String,
    pub created_at: DateTime<Utc>,
    pub votes: i64,
}

impl From<QuoteTallyRow> for QuoteTally {
    fn from(value: QuoteTallyRow) -> Self {
        let QuoteTallyRow {
            quote_id,
            project_id,
            provider_name,
            amount,
            description,
            file_url,
            file_name,
            created_at,
            votes,
        } = value;
        QuoteTally {
            quote: ProjectQuote {
                quote_id,
                project_id,
                provider_name,
                amount,
                description,
                file_url,
                file_name,
                created_at,
            },
            votes,
        }
    }
}
