//! Project resource handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use serde_json::json;

use super::parse_id;
use crate::error::{ApiError, ApiResult};
use crate::middleware::Auth;
use crate::models::{ClientSummary, Project, ProjectView, UserSummary};
use crate::request::{ProjectPayload, ValidatedJson};
use crate::state::AppState;

/// Body returned by create and update.
#[derive(Debug, Serialize)]
pub struct ProjectMutation {
    message: &'static str,
    project: ProjectView,
}

fn not_found() -> ApiError {
    ApiError::NotFound("Project".to_owned())
}

/// The referenced client must exist before a project may point at it.
async fn require_client(state: &AppState, id: uuid::Uuid) -> ApiResult<()> {
    state
        .clients
        .get(id)
        .await
        .map(|_| ())
        .ok_or_else(|| ApiError::NotFound("Client".to_owned()))
}

async fn present(state: &AppState, project: Project) -> ProjectView {
    let client = state
        .clients
        .get(project.client)
        .await
        .map(|client| ClientSummary::from(&client));
    let created_by = state
        .users
        .find_by_id(project.created_by)
        .await
        .map(|user| UserSummary::from(&user));
    ProjectView::new(project, client, created_by)
}

/// Create a project against an existing client.
pub async fn create(
    State(state): State<AppState>,
    Auth(user): Auth,
    ValidatedJson(payload): ValidatedJson<ProjectPayload>,
) -> ApiResult<(StatusCode, Json<ProjectMutation>)> {
    payload.check_dates()?;
    require_client(&state, payload.client).await?;

    let project = state
        .projects
        .insert(Project::new(payload.into(), user.id))
        .await;
    let project = present(&state, project).await;

    Ok((
        StatusCode::CREATED,
        Json(ProjectMutation {
            message: "Project created successfully",
            project,
        }),
    ))
}

/// All projects, newest first.
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<ProjectView>>> {
    let mut projects = state.projects.list().await;
    projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut views = Vec::with_capacity(projects.len());
    for project in projects {
        views.push(present(&state, project).await);
    }
    Ok(Json(views))
}

/// Projects filtered to one client. An unknown client id is just an
/// empty filter result, not a 404.
pub async fn list_by_client(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
) -> ApiResult<Json<Vec<ProjectView>>> {
    let client_id = parse_id(&client_id)?;
    let mut projects = state.projects.list_by_client(client_id).await;
    projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut views = Vec::with_capacity(projects.len());
    for project in projects {
        views.push(present(&state, project).await);
    }
    Ok(Json(views))
}

/// One project by id.
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ProjectView>> {
    let id = parse_id(&id)?;
    let project = state.projects.get(id).await.ok_or_else(not_found)?;
    Ok(Json(present(&state, project).await))
}

/// Replace a project's editable fields.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<ProjectPayload>,
) -> ApiResult<Json<ProjectMutation>> {
    let id = parse_id(&id)?;
    payload.check_dates()?;
    require_client(&state, payload.client).await?;

    let project = state
        .projects
        .update(id, payload.into())
        .await
        .ok_or_else(not_found)?;

    Ok(Json(ProjectMutation {
        message: "Project updated successfully",
        project: present(&state, project).await,
    }))
}

/// Remove a project.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let id = parse_id(&id)?;
    state.projects.delete(id).await.ok_or_else(not_found)?;
    Ok(Json(json!({ "message": "Project deleted successfully" })))
}
