//! User service: account CRUD and the detach-on-delete rule.

use taskboard_core::error::CoreError;
use taskboard_core::policy::{self, Caller};
use taskboard_core::roles::Role;
use taskboard_core::types::DbId;
use taskboard_db::models::user::{CreateUser, User, UserResponse};
use taskboard_db::repositories::{ProjectRepo, TaskRepo, UserRepo};
use taskboard_db::DbPool;

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};

fn user_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "User", id })
}

pub struct UserService;

impl UserService {
    /// List every user account. Route-gated to ADMIN.
    pub async fn get_all(pool: &DbPool) -> AppResult<Vec<UserResponse>> {
        let users = UserRepo::list(pool).await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn get_by_id(pool: &DbPool, id: DbId) -> AppResult<UserResponse> {
        let user = UserRepo::find_by_id(pool, id)
            .await?
            .ok_or_else(|| user_not_found(id))?;
        Ok(user.into())
    }

    /// Create an account with the given role, hashing the password before
    /// it ever reaches the store.
    pub async fn create(
        pool: &DbPool,
        email: &str,
        password: &str,
        role: Role,
    ) -> AppResult<UserResponse> {
        if UserRepo::exists_by_email(pool, email).await? {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Email already in use: {email}"
            ))));
        }

        let password_hash = hash_password(password)
            .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;

        let user = UserRepo::create(
            pool,
            &CreateUser {
                email: email.to_string(),
                password_hash,
                role,
            },
        )
        .await?;
        tracing::info!(user_id = user.id, role = %user.role, "User created");
        Ok(user.into())
    }

    /// Delete an account. Their assigned tasks are detached (kept, with
    /// the assignee cleared) in the same transaction. An account that
    /// still owns projects cannot be deleted.
    pub async fn delete(pool: &DbPool, caller: &Caller, id: DbId) -> AppResult<()> {
        if !policy::can_delete_user(caller) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Only administrators can delete users".into(),
            )));
        }

        UserRepo::find_by_id(pool, id)
            .await?
            .ok_or_else(|| user_not_found(id))?;

        if ProjectRepo::exists_by_owner(pool, id).await? {
            return Err(AppError::Core(CoreError::Validation(
                "Cannot delete a user who owns projects".into(),
            )));
        }

        let mut tx = pool.begin().await?;
        let detached = TaskRepo::clear_assignee(&mut tx, id).await?;
        UserRepo::delete(&mut tx, id).await?;
        tx.commit().await?;

        tracing::info!(user_id = id, detached_tasks = detached, "User deleted");
        Ok(())
    }

    /// Resolve the caller's own row. Absence means the account was deleted
    /// after the token was issued.
    pub async fn current_user(pool: &DbPool, caller: &Caller) -> AppResult<UserResponse> {
        Self::get_by_id(pool, caller.id).await
    }

    /// Look up an account by email with its password hash, for login.
    pub async fn find_for_login(pool: &DbPool, email: &str) -> AppResult<Option<User>> {
        Ok(UserRepo::find_by_email(pool, email).await?)
    }
}
