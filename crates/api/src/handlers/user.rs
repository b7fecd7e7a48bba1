//! Handlers for the `/users` resource (ADMIN management plus `/me`).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use taskboard_core::error::CoreError;
use taskboard_core::roles::Role;
use taskboard_core::types::DbId;
use taskboard_db::models::user::UserResponse;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::services::UserService;
use crate::state::AppState;

/// Request body for `POST /users` (ADMIN; any role may be assigned).
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email(message = "Email must be valid"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    pub role: Role,
}

/// GET /api/v1/users
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_caller): RequireAdmin,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = UserService::get_all(&state.pool).await?;
    Ok(Json(users))
}

/// GET /api/v1/users/me
pub async fn me(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> AppResult<Json<UserResponse>> {
    let user = UserService::current_user(&state.pool, &caller).await?;
    Ok(Json(user))
}

/// GET /api/v1/users/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAdmin(_caller): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<UserResponse>> {
    let user = UserService::get_by_id(&state.pool, id).await?;
    Ok(Json(user))
}

/// POST /api/v1/users
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_caller): RequireAdmin,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    let user = UserService::create(&state.pool, &input.email, &input.password, input.role).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// DELETE /api/v1/users/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(caller): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    UserService::delete(&state.pool, &caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
