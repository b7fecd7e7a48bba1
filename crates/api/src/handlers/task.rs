//! Handlers for the `/tasks` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use taskboard_core::error::CoreError;
use taskboard_core::tasks::{Priority, TaskStatus};
use taskboard_core::types::DbId;
use taskboard_db::models::task::{CreateTask, TaskResponse, UpdateTask};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManager;
use crate::query::{PageParams, TaskFilterParams};
use crate::response::Page;
use crate::services::TaskService;
use crate::state::AppState;

/// Request body for creating or fully updating a task. On update the
/// `projectId` must match the task's current project.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskRequest {
    #[validate(length(min = 1, message = "Task title is required"))]
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
    pub project_id: DbId,
    pub assigned_user_id: Option<DbId>,
}

/// Request body for `PUT /tasks/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct TaskStatusRequest {
    pub status: TaskStatus,
}

/// GET /api/v1/tasks
pub async fn list(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Query(page): Query<PageParams>,
) -> AppResult<Json<Page<TaskResponse>>> {
    let tasks =
        TaskService::get_all(&state.pool, &caller, &TaskFilterParams::default(), &page).await?;
    Ok(Json(tasks))
}

/// GET /api/v1/tasks/filter?status=&priority=
pub async fn filter(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Query(filters): Query<TaskFilterParams>,
    Query(page): Query<PageParams>,
) -> AppResult<Json<Page<TaskResponse>>> {
    let tasks = TaskService::get_all(&state.pool, &caller, &filters, &page).await?;
    Ok(Json(tasks))
}

/// GET /api/v1/tasks/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<TaskResponse>> {
    let task = TaskService::get_by_id(&state.pool, &caller, id).await?;
    Ok(Json(task))
}

/// GET /api/v1/tasks/user/{user_id}
pub async fn by_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(user_id): Path<DbId>,
    Query(page): Query<PageParams>,
) -> AppResult<Json<Page<TaskResponse>>> {
    let tasks = TaskService::by_assigned_user(&state.pool, &caller, user_id, &page).await?;
    Ok(Json(tasks))
}

/// POST /api/v1/tasks
pub async fn create(
    State(state): State<AppState>,
    RequireManager(caller): RequireManager,
    Json(input): Json<TaskRequest>,
) -> AppResult<(StatusCode, Json<TaskResponse>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    let task = TaskService::create(
        &state.pool,
        &caller,
        CreateTask {
            title: input.title,
            description: input.description,
            status: input.status,
            due_date: input.due_date,
            priority: input.priority,
            project_id: input.project_id,
            assigned_user_id: input.assigned_user_id,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// PUT /api/v1/tasks/{id}
///
/// Full update. Authenticated only: an assigned USER may update their own
/// task, so the role gate lives in the service.
pub async fn update(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<TaskRequest>,
) -> AppResult<Json<TaskResponse>> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    let task = TaskService::update(
        &state.pool,
        &caller,
        id,
        input.project_id,
        UpdateTask {
            title: input.title,
            description: input.description,
            status: input.status,
            due_date: input.due_date,
            priority: input.priority,
            assigned_user_id: input.assigned_user_id,
        },
    )
    .await?;
    Ok(Json(task))
}

/// PUT /api/v1/tasks/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<TaskStatusRequest>,
) -> AppResult<Json<TaskResponse>> {
    let task = TaskService::update_status(&state.pool, &caller, id, input.status).await?;
    Ok(Json(task))
}

/// DELETE /api/v1/tasks/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireManager(caller): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    TaskService::delete(&state.pool, &caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
