use chrono::{DateTime, Utc};
use derive_new::new;
use garde::Validate;
use kernel::model::{
    id::{ProjectId, QuoteId, ResidentId},
    project::{
        event::{CreateProject, CreateQuote, UpdateProjectStatus},
        CommunityProject, ProjectDetail, ProjectPriority, ProjectStatus, QuoteTally,
    },
};
use serde::{Deserialize, Serialize};

use super::define_name_enum;

define_name_enum!(ProjectStatusName, ProjectStatus, [Proposal, Voting, Approved, Rejected]);
define_name_enum!(ProjectPriorityName, ProjectPriority, [High, Medium, Low]);

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    #[garde(length(min = 5))]
    pub title: String,
    #[garde(length(min = 10))]
    pub description: String,
    #[garde(skip)]
    #[serde(default)]
    pub justification: String,
    #[garde(skip)]
    pub priority: ProjectPriorityName,
    #[garde(skip)]
    #[serde(default)]
    pub viability: String,
    #[garde(range(min = 0))]
    pub budget: i64,
    #[garde(skip)]
    pub status: Option<ProjectStatusName>,
    #[garde(skip)]
    pub voting_deadline: Option<DateTime<Utc>>,
}

#[derive(new)]
pub struct CreateProjectRequestWithCreator(ResidentId, CreateProjectRequest);

impl From<CreateProjectRequestWithCreator> for CreateProject {
    fn from(value: CreateProjectRequestWithCreator) -> Self {
        let CreateProjectRequestWithCreator(
            created_by,
            CreateProjectRequest {
                title,
                description,
                justification,
                priority,
                viability,
                budget,
                status,
                voting_deadline,
            },
        ) = value;
        CreateProject {
            title,
            description,
            justification,
            priority: priority.into(),
            viability,
            budget,
            status: status.map_or(ProjectStatus::Proposal, ProjectStatus::from),
            voting_deadline,
            created_by,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectStatusRequest {
    pub status: ProjectStatusName,
}

#[derive(new)]
pub struct UpdateProjectStatusRequestWithId(ProjectId, UpdateProjectStatusRequest);

impl From<UpdateProjectStatusRequestWithId> for UpdateProjectStatus {
    fn from(value: UpdateProjectStatusRequestWithId) -> Self {
        let UpdateProjectStatusRequestWithId(project_id, UpdateProjectStatusRequest { status }) =
            value;
        UpdateProjectStatus {
            project_id,
            status: status.into(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuoteRequest {
    #[garde(length(min = 1))]
    pub provider_name: String,
    #[garde(range(min = 0))]
    pub amount: i64,
    #[garde(skip)]
    #[serde(default)]
    pub description: String,
    #[garde(skip)]
    #[serde(default)]
    pub file_url: String,
    #[garde(skip)]
    #[serde(default)]
    pub file_name: String,
}

#[derive(new)]
pub struct CreateQuoteRequestWithProjectId(ProjectId, CreateQuoteRequest);

impl From<CreateQuoteRequestWithProjectId> for CreateQuote {
    fn from(value: CreateQuoteRequestWithProjectId) -> Self {
        let CreateQuoteRequestWithProjectId(
            project_id,
            CreateQuoteRequest {
                provider_name,
                amount,
                description,
                file_url,
                file_name,
            },
        ) = value;
        CreateQuote {
            project_id,
            provider_name,
            amount,
            description,
            file_url,
            file_name,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastVoteRequest {
    pub quote_id: QuoteId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    pub project_id: ProjectId,
    pub title: String,
    pub description: String,
    pub justification: String,
    pub priority: ProjectPriorityName,
    pub viability: String,
    pub budget: i64,
    pub status: ProjectStatusName,
    pub voting_deadline: Option<DateTime<Utc>>,
    pub created_by: ResidentId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CommunityProject> for ProjectResponse {
    fn from(value: CommunityProject) -> Self {
        let CommunityProject {
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
        Self {
            project_id,
            title,
            description,
            justification,
            priority: priority.into(),
            viability,
            budget,
            status: status.into(),
            voting_deadline,
            created_by,
            created_at,
            updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectsResponse {
    pub items: Vec<ProjectResponse>,
}

impl From<Vec<CommunityProject>> for ProjectsResponse {
    fn from(value: Vec<CommunityProject>) -> Self {
        Self {
            items: value.into_iter().map(ProjectResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub quote_id: QuoteId,
    pub provider_name: String,
    pub amount: i64,
    pub description: String,
    pub file_url: String,
    pub file_name: String,
    pub created_at: DateTime<Utc>,
    pub votes: i64,
}

impl From<QuoteTally> for QuoteResponse {
    fn from(value: QuoteTally) -> Self {
        let QuoteTally { quote, votes } = value;
        Self {
            quote_id: quote.quote_id,
            provider_name: quote.provider_name,
            amount: quote.amount,
            description: quote.description,
            file_url: quote.file_url,
            file_name: quote.file_name,
            created_at: quote.created_at,
            votes,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetailResponse {
    #[serde(flatten)]
    pub project: ProjectResponse,
    pub total_votes: i64,
    pub leading_quote_id: Option<QuoteId>,
    pub quotes: Vec<QuoteResponse>,
}

impl From<ProjectDetail> for ProjectDetailResponse {
    fn from(value: ProjectDetail) -> Self {
        let total_votes = value.total_votes();
        let leading_quote_id = value.leading_quote().map(|q| q.quote.quote_id);
        let ProjectDetail { project, quotes } = value;
        Self {
            project: project.into(),
            total_votes,
            leading_quote_id,
            quotes: quotes.into_iter().map(QuoteResponse::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("Lights", "Replace common area lights", 1000, true)]
    #[case("Lamp", "Replace common area lights", 1000, false)]
    #[case("Lights", "Too short", 1000, false)]
    #[case("Lights", "Replace common area lights", -1, false)]
    fn project_request_validation(
        #[case] title: &str,
        #[case] description: &str,
        #[case] budget: i64,
        #[case] valid: bool,
    ) {
        let req: CreateProjectRequest = serde_json::from_value(json!({
            "title": title,
            "description": description,
            "priority": "high",
            "budget": budget,
        }))
        .unwrap();
        assert_eq!(req.validate(&()).is_ok(), valid);
    }

    #[test]
    fn new_projects_start_as_proposals() {
        let req: CreateProjectRequest = serde_json::from_value(json!({
            "title": "Lights",
            "description": "Replace common area lights",
            "priority": "low",
            "budget": 0,
        }))
        .unwrap();
        let creator = ResidentId::new();
        let event = CreateProject::from(CreateProjectRequestWithCreator::new(creator, req));
        assert_eq!(event.status, ProjectStatus::Proposal);
        assert_eq!(event.priority, ProjectPriority::Low);
        assert_eq!(event.created_by, creator);
    }
}
