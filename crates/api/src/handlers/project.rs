//! Handlers for the `/projects` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use taskboard_core::error::CoreError;
use taskboard_core::types::DbId;
use taskboard_db::models::project::{CreateProject, ProjectResponse, UpdateProject};
use taskboard_db::models::task::TaskResponse;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManager;
use crate::query::PageParams;
use crate::response::Page;
use crate::services::{ProjectService, TaskService};
use crate::state::AppState;

/// Request body for creating or updating a project.
#[derive(Debug, Deserialize, Validate)]
pub struct ProjectRequest {
    #[validate(length(min = 1, message = "Project name is required"))]
    pub name: String,
    pub description: Option<String>,
}

/// GET /api/v1/projects
pub async fn list(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Query(page): Query<PageParams>,
) -> AppResult<Json<Page<ProjectResponse>>> {
    let projects = ProjectService::get_all(&state.pool, &caller, &page).await?;
    Ok(Json(projects))
}

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    RequireManager(caller): RequireManager,
    Json(input): Json<ProjectRequest>,
) -> AppResult<(StatusCode, Json<ProjectResponse>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    let project = ProjectService::create(
        &state.pool,
        &caller,
        CreateProject {
            name: input.name,
            description: input.description,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProjectResponse>> {
    let project = ProjectService::get_by_id(&state.pool, &caller, id).await?;
    Ok(Json(project))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireManager(caller): RequireManager,
    Path(id): Path<DbId>,
    Json(input): Json<ProjectRequest>,
) -> AppResult<Json<ProjectResponse>> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    let project = ProjectService::update(
        &state.pool,
        &caller,
        id,
        UpdateProject {
            name: input.name,
            description: input.description,
        },
    )
    .await?;
    Ok(Json(project))
}

/// DELETE /api/v1/projects/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireManager(caller): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    ProjectService::delete(&state.pool, &caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/projects/{id}/tasks
pub async fn tasks(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<DbId>,
    Query(page): Query<PageParams>,
) -> AppResult<Json<Page<TaskResponse>>> {
    let tasks = TaskService::by_project(&state.pool, &caller, id, &page).await?;
    Ok(Json(tasks))
}
