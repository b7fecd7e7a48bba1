//! Route definitions for the `/users` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// Routes mounted at `/users`. Management endpoints are admin-gated by
/// their handlers; `/me` only requires authentication.
///
/// ```text
/// GET    /        -> list
/// POST   /        -> create
/// GET    /me      -> me
/// GET    /{id}    -> get_by_id
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(user::list).post(user::create))
        .route("/me", get(user::me))
        .route("/{id}", get(user::get_by_id).delete(user::delete))
}
