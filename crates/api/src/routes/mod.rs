pub mod auth;
pub mod health;
pub mod project;
pub mod task;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login               login (public)
/// /auth/register            self-service signup, USER role (public)
///
/// /users                    list, create (admin only)
/// /users/me                 caller's own account (any authenticated)
/// /users/{id}               get, delete (admin only)
///
/// /projects                 list (scoped), create (manager/admin)
/// /projects/{id}            get, update, delete
/// /projects/{id}/tasks      tasks of a project (access-gated)
///
/// /tasks                    list (scoped)
/// /tasks/filter             list with ?status=&priority=
/// /tasks/user/{user_id}     tasks assigned to a user
/// /tasks/{id}               get, update, delete
/// /tasks/{id}/status        status-only update
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", user::router())
        .nest("/projects", project::router())
        .nest("/tasks", task::router())
}
