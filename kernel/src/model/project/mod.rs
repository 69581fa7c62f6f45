use crate::model::id::{ProjectId, QuoteId, ResidentId};
use chrono::{DateTime, Utc};
use strum::{AsRefStr, EnumString};

pub mod event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum ProjectStatus {
    Proposal,
    Voting,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum ProjectPriority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommunityProject {
    pub project_id: ProjectId,
    pub title: String,
    pub description: String,
    pub justification: String,
    pub priority: ProjectPriority,
    pub viability: String,
    pub budget: i64,
    pub status: ProjectStatus,
    pub voting_deadline: Option<DateTime<Utc>>,
    pub created_by: ResidentId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CommunityProject {
    pub fn accepts_votes(&self, now: DateTime<Utc>) -> bool {
        self.status == ProjectStatus::Voting
            && self.voting_deadline.map_or(true, |deadline| now <= deadline)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectQuote {
    pub quote_id: QuoteId,
    pub project_id: ProjectId,
    pub provider_name: String,
    pub amount: i64,
    pub description: String,
    pub file_url: String,
    pub file_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteTally {
    pub quote: ProjectQuote,
    pub votes: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDetail {
    pub project: CommunityProject,
    pub quotes: Vec<QuoteTally>,
}

impl ProjectDetail {
    pub fn total_votes(&self) -> i64 {
        self.quotes.iter().map(|q| q.votes).sum()
    }

    /// 最多得票の見積もり。同票の場合は先に登録されたものを返す
    pub fn leading_quote(&self) -> Option<&QuoteTally> {
        self.quotes
            .iter()
            .filter(|q| q.votes > 0)
            .fold(None, |best: Option<&QuoteTally>, q| match best {
                Some(b) if b.votes >= q.votes => Some(b),
                _ => Some(q),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn project(status: ProjectStatus, deadline: Option<DateTime<Utc>>) -> CommunityProject {
        let now = Utc::now();
        CommunityProject {
            project_id: ProjectId::new(),
            title: "LED lighting".into(),
            description: "Replace common area lights".into(),
            justification: "Energy savings".into(),
            priority: ProjectPriority::Medium,
            viability: "high".into(),
            budget: 6_500_000,
            status,
            voting_deadline: deadline,
            created_by: ResidentId::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn tally(project_id: ProjectId, votes: i64) -> QuoteTally {
        QuoteTally {
            quote: ProjectQuote {
                quote_id: QuoteId::new(),
                project_id,
                provider_name: "provider".into(),
                amount: 1_000,
                description: "quote".into(),
                file_url: String::new(),
                file_name: String::new(),
                created_at: Utc::now(),
            },
            votes,
        }
    }

    #[test]
    fn votes_are_accepted_only_while_voting_and_before_the_deadline() {
        let now = Utc::now();
        assert!(project(ProjectStatus::Voting, None).accepts_votes(now));
        assert!(project(ProjectStatus::Voting, Some(now + Duration::days(1))).accepts_votes(now));
        assert!(!project(ProjectStatus::Voting, Some(now - Duration::days(1))).accepts_votes(now));
        assert!(!project(ProjectStatus::Proposal, None).accepts_votes(now));
        assert!(!project(ProjectStatus::Approved, None).accepts_votes(now));
    }

    #[test]
    fn leading_quote_prefers_the_earliest_on_ties() {
        let p = project(ProjectStatus::Voting, None);
        let detail = ProjectDetail {
            quotes: vec![
                tally(p.project_id, 1),
                tally(p.project_id, 3),
                tally(p.project_id, 3),
            ],
            project: p,
        };

        assert_eq!(detail.total_votes(), 7);
        let leading = detail.leading_quote().unwrap();
        assert_eq!(leading.quote.quote_id, detail.quotes[1].quote.quote_id);
    }

    #[test]
    fn no_leading_quote_without_votes() {
        let p = project(ProjectStatus::Voting, None);
        let detail = ProjectDetail {
            quotes: vec![tally(p.project_id, 0)],
            project: p,
        };
        assert!(detail.leading_quote().is_none());
    }
}
