//! User entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use taskboard_core::roles::Role;
use taskboard_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
///
/// Contains the password hash. NEVER serialize this to API responses;
/// use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub create_date: Timestamp,
    pub update_date: Timestamp,
}

/// Reduced user projection for API responses (no password hash, no audit
/// columns). Also used as the nested owner/assignee shape inside project
/// and task responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub email: String,
    pub role: Role,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role,
        }
    }
}

/// Input for inserting a new user. The password is hashed before this
/// struct is built.
#[derive(Debug)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}
