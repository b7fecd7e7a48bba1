//! Repository for the `projects` table.

use sqlx::{PgConnection, PgPool};
use taskboard_core::types::DbId;

use crate::models::project::{CreateProject, Project, ProjectDetail, UpdateProject};

/// Column list shared across plain-row queries.
const COLUMNS: &str = "id, name, description, owner_id, create_date, update_date";

/// Join select producing [`ProjectDetail`] rows (project + owner columns).
const DETAIL_SELECT: &str = "SELECT p.id, p.name, p.description,
            p.create_date, p.update_date,
            o.id AS owner_id, o.email AS owner_email, o.role AS owner_role
     FROM projects p
     JOIN users o ON o.id = p.owner_id";

/// Provides CRUD and ownership queries for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project owned by `owner_id`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateProject,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (name, description, owner_id)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(owner_id)
            .fetch_one(pool)
            .await
    }

    /// Find a project by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a project with its owner projection joined in.
    pub async fn find_detail_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProjectDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE p.id = $1");
        sqlx::query_as::<_, ProjectDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update the caller-mutable fields (name, description). Owner, id and
    /// create_date are untouched. Returns `None` if no row exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects
             SET name = $2, description = $3, update_date = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Delete a project row. Returns `true` if a row was removed.
    ///
    /// Runs on a transaction connection: the caller deletes the project's
    /// tasks in the same transaction first.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List all projects, id ascending, paginated.
    pub async fn list_all(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProjectDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} ORDER BY p.id ASC LIMIT $1 OFFSET $2");
        sqlx::query_as::<_, ProjectDetail>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Total number of project rows.
    pub async fn count_all(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM projects")
            .fetch_one(pool)
            .await?;
        Ok(count.0)
    }

    /// List projects owned by a user, id ascending, paginated.
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProjectDetail>, sqlx::Error> {
        let query =
            format!("{DETAIL_SELECT} WHERE p.owner_id = $1 ORDER BY p.id ASC LIMIT $2 OFFSET $3");
        sqlx::query_as::<_, ProjectDetail>(&query)
            .bind(owner_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Number of projects owned by a user.
    pub async fn count_by_owner(pool: &PgPool, owner_id: DbId) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM projects WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(pool)
            .await?;
        Ok(count.0)
    }

    /// Ids of all projects owned by a user (for task-list scoping).
    pub async fn owned_ids(pool: &PgPool, owner_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> =
            sqlx::query_as("SELECT id FROM projects WHERE owner_id = $1 ORDER BY id ASC")
                .bind(owner_id)
                .fetch_all(pool)
                .await?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    /// Whether a user owns at least one project.
    pub async fn exists_by_owner(pool: &PgPool, owner_id: DbId) -> Result<bool, sqlx::Error> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM projects WHERE owner_id = $1)")
                .bind(owner_id)
                .fetch_one(pool)
                .await?;
        Ok(exists.0)
    }
}
