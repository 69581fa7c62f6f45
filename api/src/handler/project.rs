use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use garde::Validate;
use kernel::model::{id::ProjectId, project::event::CastVote};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::AuthorizedUser,
    model::project::{
        CastVoteRequest, CreateProjectRequest, CreateProjectRequestWithCreator,
        CreateQuoteRequest, CreateQuoteRequestWithProjectId, ProjectDetailResponse,
        ProjectsResponse, UpdateProjectStatusRequest, UpdateProjectStatusRequestWithId,
    },
};

pub async fn register_project(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateProjectRequest>,
) -> AppResult<StatusCode> {
    user.ensure_admin()?;
    req.validate(&())?;

    registry
        .project_repository()
        .create(CreateProjectRequestWithCreator::new(user.id(), req).into())
        .await
        .map(|_| StatusCode::CREATED)
}

pub async fn list_projects(
    _user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ProjectsResponse>> {
    registry
        .project_repository()
        .find_all()
        .await
        .map(ProjectsResponse::from)
        .map(Json)
}

pub async fn show_project(
    _user: AuthorizedUser,
    Path(project_id): Path<ProjectId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ProjectDetailResponse>> {
    registry
        .project_repository()
        .find_by_id(project_id)
        .await
        .and_then(|detail| match detail {
            Some(detail) => Ok(Json(detail.into())),
            None => Err(AppError::EntityNotFound(format!(
                "プロジェクト（{project_id}）が見つかりませんでした。"
            ))),
        })
}

pub async fn update_project_status(
    user: AuthorizedUser,
    Path(project_id): Path<ProjectId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateProjectStatusRequest>,
) -> AppResult<StatusCode> {
    user.ensure_admin()?;

    registry
        .project_repository()
        .update_status(UpdateProjectStatusRequestWithId::new(project_id, req).into())
        .await
        .map(|_| StatusCode::OK)
}

pub async fn register_quote(
    user: AuthorizedUser,
    Path(project_id): Path<ProjectId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateQuoteRequest>,
) -> AppResult<StatusCode> {
    user.ensure_admin()?;
    req.validate(&())?;

    registry
        .project_repository()
        .add_quote(CreateQuoteRequestWithProjectId::new(project_id, req).into())
        .await
        .map(|_| StatusCode::CREATED)
}

pub async fn cast_vote(
    user: AuthorizedUser,
    Path(project_id): Path<ProjectId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<CastVoteRequest>,
) -> AppResult<StatusCode> {
    let vote = CastVote::new(project_id, user.id(), req.quote_id, Utc::now());
    registry
        .project_repository()
        .cast_vote(vote)
        .await
        .map(|_| StatusCode::CREATED)
}
