//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does
//! not meet the minimum requirement. These are the controller-level
//! pre-checks; the fine-grained ownership/assignment rules run in the
//! service layer via the policy module.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use taskboard_core::error::CoreError;
use taskboard_core::policy::Caller;
use taskboard_core::roles::Role;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the ADMIN role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(caller): RequireAdmin) -> AppResult<Json<()>> {
///     // caller is guaranteed to be an admin here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub Caller);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(caller) = AuthUser::from_request_parts(parts, state).await?;
        if caller.role != Role::Admin {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(caller))
    }
}

/// Requires MANAGER or ADMIN role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn manager_or_admin(RequireManager(caller): RequireManager) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireManager(pub Caller);

impl FromRequestParts<AppState> for RequireManager {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(caller) = AuthUser::from_request_parts(parts, state).await?;
        if caller.role != Role::Admin && caller.role != Role::Manager {
            return Err(AppError::Core(CoreError::Forbidden(
                "Manager or Admin role required".into(),
            )));
        }
        Ok(RequireManager(caller))
    }
}
