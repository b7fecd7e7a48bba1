//! Route definitions for the `/tasks` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::task;
use crate::state::AppState;

/// Routes mounted at `/tasks`.
///
/// ```text
/// GET    /                -> list (scoped)
/// POST   /                -> create (manager/admin)
/// GET    /filter          -> list with ?status=&priority=
/// GET    /user/{user_id}  -> tasks assigned to a user
/// GET    /{id}            -> get_by_id
/// PUT    /{id}            -> update (assigned USER allowed, gate in service)
/// DELETE /{id}            -> delete (manager/admin)
/// PUT    /{id}/status     -> status-only update
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(task::list).post(task::create))
        .route("/filter", get(task::filter))
        .route("/user/{user_id}", get(task::by_user))
        .route(
            "/{id}",
            get(task::get_by_id).put(task::update).delete(task::delete),
        )
        .route("/{id}/status", put(task::update_status))
}
