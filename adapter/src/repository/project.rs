use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::{ProjectId, QuoteId, VoteId},
    project::{
        event::{CastVote, CreateProject, CreateQuote, UpdateProjectStatus},
        CommunityProject, ProjectDetail, QuoteTally,
    },
};
use kernel::repository::project::ProjectRepository;
use shared::error::{AppError, AppResult};

use super::is_unique_violation;
use crate::database::{
    model::project::{ProjectRow, QuoteTallyRow},
    ConnectionPool,
};

#[derive(new)]
pub struct ProjectRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl ProjectRepository for ProjectRepositoryImpl {
    async fn create(&self, event: CreateProject) -> AppResult<ProjectId> {
        let project_id = ProjectId::new();
        let res = sqlx::query(
            r#"
                INSERT INTO community_projects
                (project_id, title, description, justification, priority,
                viability, budget, status, voting_deadline, created_by)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(project_id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.justification)
        .bind(event.priority.as_ref())
        .bind(&event.viability)
        .bind(event.budget)
        .bind(event.status.as_ref())
        .bind(event.voting_deadline)
        .bind(event.created_by)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No project record has been created".into(),
            ));
        }

        Ok(project_id)
    }

    async fn find_all(&self) -> AppResult<Vec<CommunityProject>> {
        sqlx::query_as::<_, ProjectRow>(
            r#"
                SELECT
                project_id, title, description, justification, priority, viability,
                budget, status, voting_deadline, created_by, created_at, updated_at
                FROM community_projects
                ORDER BY created_at DESC
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(CommunityProject::try_from)
        .collect()
    }

    async fn find_by_id(&self, project_id: ProjectId) -> AppResult<Option<ProjectDetail>> {
        let project = sqlx::query_as::<_, ProjectRow>(
            r#"
                SELECT
                project_id, title, description, justification, priority, viability,
                budget, status, voting_deadline, created_by, created_at, updated_at
                FROM community_projects
                WHERE project_id = $1
            "#,
        )
        .bind(project_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some(project) = project else {
            return Ok(None);
        };
        let project = CommunityProject::try_from(project)?;

        let quotes = sqlx::query_as::<_, QuoteTallyRow>(
            r#"
                SELECT
                q.quote_id, q.project_id, q.provider_name, q.amount,
                q.description, q.file_url, q.file_name, q.created_at,
                COUNT(v.vote_id) AS votes
                FROM project_quotes AS q
                LEFT JOIN project_votes AS v ON v.quote_id = q.quote_id
                WHERE q.project_id = $1
                GROUP BY q.quote_id
                ORDER BY q.created_at ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(QuoteTally::from)
        .collect();

        Ok(Some(ProjectDetail { project, quotes }))
    }

    async fn update_status(&self, event: UpdateProjectStatus) -> AppResult<()> {
        let res = sqlx::query("UPDATE community_projects SET status = $2 WHERE project_id = $1")
            .bind(event.project_id)
            .bind(event.status.as_ref())
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "プロジェクト（{}）が見つかりませんでした。",
                event.project_id
            )));
        }

        Ok(())
    }

    async fn add_quote(&self, event: CreateQuote) -> AppResult<QuoteId> {
        let quote_id = QuoteId::new();
        // プロジェクトが存在しなければ 1 行も挿入されない
        let res = sqlx::query(
            r#"
                INSERT INTO project_quotes
                (quote_id, project_id, provider_name, amount, description, file_url, file_name)
                SELECT $1, project_id, $3, $4, $5, $6, $7
                FROM community_projects
                WHERE project_id = $2
            "#,
        )
        .bind(quote_id)
        .bind(event.project_id)
        .bind(&event.provider_name)
        .bind(event.amount)
        .bind(&event.description)
        .bind(&event.file_url)
        .bind(&event.file_name)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "プロジェクト（{}）が見つかりませんでした。",
                event.project_id
            )));
        }

        Ok(quote_id)
    }

    async fn cast_vote(&self, event: CastVote) -> AppResult<VoteId> {
        let mut tx = self.db.begin().await?;

        // 事前のチェックとして、以下を調べる。
        // - プロジェクトが投票受付中で、締め切りを過ぎていないか
        // - 見積もりがそのプロジェクトのものか
        {
            let project = sqlx::query_as::<_, ProjectRow>(
                r#"
                    SELECT
                    project_id, title, description, justification, priority, viability,
                    budget, status, voting_deadline, created_by, created_at, updated_at
                    FROM community_projects
                    WHERE project_id = $1
                    FOR SHARE
                "#,
            )
            .bind(event.project_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?
            .map(CommunityProject::try_from)
            .transpose()?;

            let Some(project) = project else {
                return Err(AppError::EntityNotFound(format!(
                    "プロジェクト（{}）が見つかりませんでした。",
                    event.project_id
                )));
            };
            if !project.accepts_votes(event.voted_at) {
                return Err(AppError::UnprocessableEntity(format!(
                    "プロジェクト（{}）は投票を受け付けていません。",
                    event.project_id
                )));
            }

            let owner = sqlx::query_scalar::<_, ProjectId>(
                "SELECT project_id FROM project_quotes WHERE quote_id = $1",
            )
            .bind(event.quote_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
            if owner != Some(event.project_id) {
                return Err(AppError::UnprocessableEntity(format!(
                    "見積もり（{}）はこのプロジェクトのものではありません。",
                    event.quote_id
                )));
            }
        }

        let vote_id = VoteId::new();
        sqlx::query(
            r#"
                INSERT INTO project_votes (vote_id, project_id, resident_id, quote_id, created_at)
                VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(vote_id)
        .bind(event.project_id)
        .bind(event.resident_id)
        .bind(event.quote_id)
        .bind(event.voted_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::UnprocessableEntity("このプロジェクトにはすでに投票しています。".into())
            } else {
                AppError::SpecificOperationError(e)
            }
        })?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(vote_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use kernel::model::{
        id::ResidentId,
        project::{ProjectPriority, ProjectStatus},
    };

    async fn seed_resident(pool: &sqlx::PgPool, email: &str) -> ResidentId {
        sqlx::query_scalar(
            r#"
                INSERT INTO residents
                (full_name, email, password_hash, phone, house_number, interior_number, role, payment_status)
                VALUES ('Resident', $1, 'x', '3001234567', '1', 1, 'resident', 'current')
                RETURNING resident_id
            "#,
        )
        .bind(email)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    fn quote(project_id: ProjectId, provider: &str) -> CreateQuote {
        CreateQuote {
            project_id,
            provider_name: provider.into(),
            amount: 6_500_000,
            description: "LED panels".into(),
            file_url: String::new(),
            file_name: String::new(),
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_vote_on_project(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = ProjectRepositoryImpl::new(ConnectionPool::new(pool.clone()));
        let admin = seed_resident(&pool, "admin@example.com").await;
        let voter = seed_resident(&pool, "voter@example.com").await;
        let now = Utc::now();

        let project_id = repo
            .create(CreateProject {
                title: "Common area lighting".into(),
                description: "Replace lights with LED".into(),
                justification: "Energy savings".into(),
                priority: ProjectPriority::Medium,
                viability: "high".into(),
                budget: 7_000_000,
                status: ProjectStatus::Proposal,
                voting_deadline: Some(now + Duration::days(7)),
                created_by: admin,
            })
            .await?;
        let first = repo.add_quote(quote(project_id, "Lumen")).await?;
        let second = repo.add_quote(quote(project_id, "Brillo")).await?;

        // 提案中のプロジェクトには投票できない
        let res = repo
            .cast_vote(CastVote::new(project_id, voter, first, now))
            .await;
        assert!(matches!(res, Err(AppError::UnprocessableEntity(_))));

        repo.update_status(UpdateProjectStatus::new(project_id, ProjectStatus::Voting))
            .await?;
        repo.cast_vote(CastVote::new(project_id, voter, second, now))
            .await?;

        let res = repo
            .cast_vote(CastVote::new(project_id, voter, first, now))
            .await;
        assert!(matches!(res, Err(AppError::UnprocessableEntity(_))));

        let detail = repo.find_by_id(project_id).await?.unwrap();
        assert_eq!(detail.total_votes(), 1);
        assert_eq!(
            detail.leading_quote().map(|q| q.quote.quote_id),
            Some(second)
        );

        Ok(())
    }
}
