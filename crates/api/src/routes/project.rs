//! Route definitions for the `/projects` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::project;
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /             -> list (scoped)
/// POST   /             -> create (manager/admin)
/// GET    /{id}         -> get_by_id
/// PUT    /{id}         -> update
/// DELETE /{id}         -> delete
/// GET    /{id}/tasks   -> tasks of the project
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .route("/{id}/tasks", get(project::tasks))
}
