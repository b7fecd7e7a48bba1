//! Repository for the `tasks` table.
//!
//! List queries return [`TaskDetail`] join rows so the API can render the
//! nested project/assignee projections without follow-up queries. Role
//! visibility arrives here as a pre-computed [`TaskScope`]; this module
//! applies it mechanically and never inspects roles itself.

use sqlx::{PgConnection, PgPool};
use taskboard_core::policy::TaskScope;
use taskboard_core::tasks::{Priority, TaskStatus};
use taskboard_core::types::DbId;

use crate::models::task::{CreateTask, Task, TaskDetail, UpdateTask};

/// Column list shared across plain-row queries.
const COLUMNS: &str = "id, title, description, status, due_date, priority, \
                       project_id, assigned_user_id, create_date, update_date";

/// Join select producing [`TaskDetail`] rows (task + project + owner +
/// optional assignee columns).
const DETAIL_SELECT: &str = "SELECT t.id, t.title, t.description, t.status, t.due_date, t.priority,
            t.create_date, t.update_date,
            p.id AS project_id, p.name AS project_name, p.description AS project_description,
            p.create_date AS project_create_date, p.update_date AS project_update_date,
            o.id AS owner_id, o.email AS owner_email, o.role AS owner_role,
            a.id AS assignee_id, a.email AS assignee_email, a.role AS assignee_role
     FROM tasks t
     JOIN projects p ON p.id = t.project_id
     JOIN users o ON o.id = p.owner_id
     LEFT JOIN users a ON a.id = t.assigned_user_id";

/// Status/priority filters plus the caller's visibility scope for list
/// queries. Filters and scope are ANDed together.
#[derive(Debug, Clone)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub scope: TaskScope,
}

/// Decompose a scope into the two NULL-able binds of the list query.
fn scope_binds(scope: &TaskScope) -> (Option<Vec<DbId>>, Option<DbId>) {
    match scope {
        TaskScope::All => (None, None),
        TaskScope::ProjectsIn(ids) => (Some(ids.clone()), None),
        TaskScope::AssignedTo(user_id) => (None, Some(*user_id)),
    }
}

/// Provides CRUD and predicate queries for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateTask) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks (title, description, status, due_date, priority,
                                project_id, assigned_user_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.status.as_str())
            .bind(input.due_date)
            .bind(input.priority.as_str())
            .bind(input.project_id)
            .bind(input.assigned_user_id)
            .fetch_one(pool)
            .await
    }

    /// Find a task by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a task with its project/owner/assignee projections joined in.
    pub async fn find_detail_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<TaskDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE t.id = $1");
        sqlx::query_as::<_, TaskDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Full update of the caller-mutable fields. The project reference is
    /// immutable and not part of the statement. Returns `None` if no row
    /// exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTask,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks
             SET title = $2, description = $3, status = $4, due_date = $5,
                 priority = $6, assigned_user_id = $7, update_date = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.status.as_str())
            .bind(input.due_date)
            .bind(input.priority.as_str())
            .bind(input.assigned_user_id)
            .fetch_optional(pool)
            .await
    }

    /// Narrow update: status only. Returns `None` if no row exists.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: TaskStatus,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET status = $2, update_date = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Delete a task row. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List tasks matching the filter within the caller's scope, id
    /// ascending, paginated.
    ///
    /// Contract: an empty `ProjectsIn` scope returns the empty vec without
    /// touching the database.
    pub async fn list_scoped(
        pool: &PgPool,
        filter: &TaskFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TaskDetail>, sqlx::Error> {
        if filter.scope.is_empty() {
            return Ok(Vec::new());
        }

        let (project_ids, assignee_id) = scope_binds(&filter.scope);
        let query = format!(
            "{DETAIL_SELECT}
             WHERE ($1::text IS NULL OR t.status = $1)
               AND ($2::text IS NULL OR t.priority = $2)
               AND ($3::bigint[] IS NULL OR t.project_id = ANY($3))
               AND ($4::bigint IS NULL OR t.assigned_user_id = $4)
             ORDER BY t.id ASC LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, TaskDetail>(&query)
            .bind(filter.status.map(|s| s.as_str()))
            .bind(filter.priority.map(|p| p.as_str()))
            .bind(project_ids)
            .bind(assignee_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Number of tasks matching the filter within the caller's scope.
    pub async fn count_scoped(pool: &PgPool, filter: &TaskFilter) -> Result<i64, sqlx::Error> {
        if filter.scope.is_empty() {
            return Ok(0);
        }

        let (project_ids, assignee_id) = scope_binds(&filter.scope);
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM tasks t
             WHERE ($1::text IS NULL OR t.status = $1)
               AND ($2::text IS NULL OR t.priority = $2)
               AND ($3::bigint[] IS NULL OR t.project_id = ANY($3))
               AND ($4::bigint IS NULL OR t.assigned_user_id = $4)",
        )
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.priority.map(|p| p.as_str()))
        .bind(project_ids)
        .bind(assignee_id)
        .fetch_one(pool)
        .await?;
        Ok(count.0)
    }

    /// List all tasks in a project, id ascending, paginated. Access is
    /// checked by the caller; within an accessible project there is no
    /// further per-role filtering.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TaskDetail>, sqlx::Error> {
        let query =
            format!("{DETAIL_SELECT} WHERE t.project_id = $1 ORDER BY t.id ASC LIMIT $2 OFFSET $3");
        sqlx::query_as::<_, TaskDetail>(&query)
            .bind(project_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Number of tasks in a project.
    pub async fn count_by_project(pool: &PgPool, project_id: DbId) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE project_id = $1")
            .bind(project_id)
            .fetch_one(pool)
            .await?;
        Ok(count.0)
    }

    /// List tasks assigned to a user, id ascending, paginated.
    pub async fn list_by_assignee(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TaskDetail>, sqlx::Error> {
        let query = format!(
            "{DETAIL_SELECT} WHERE t.assigned_user_id = $1 ORDER BY t.id ASC LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, TaskDetail>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Number of tasks assigned to a user.
    pub async fn count_by_assignee(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE assigned_user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await?;
        Ok(count.0)
    }

    /// List tasks assigned to a user restricted to a project id set
    /// (a manager viewing someone else's tasks sees only the subset in
    /// projects they own).
    pub async fn list_by_assignee_in_projects(
        pool: &PgPool,
        user_id: DbId,
        project_ids: &[DbId],
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TaskDetail>, sqlx::Error> {
        let query = format!(
            "{DETAIL_SELECT}
             WHERE t.assigned_user_id = $1 AND t.project_id = ANY($2)
             ORDER BY t.id ASC LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, TaskDetail>(&query)
            .bind(user_id)
            .bind(project_ids)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Number of tasks assigned to a user within a project id set.
    pub async fn count_by_assignee_in_projects(
        pool: &PgPool,
        user_id: DbId,
        project_ids: &[DbId],
    ) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM tasks
             WHERE assigned_user_id = $1 AND project_id = ANY($2)",
        )
        .bind(user_id)
        .bind(project_ids)
        .fetch_one(pool)
        .await?;
        Ok(count.0)
    }

    /// Whether a user has at least one task assigned to them in a project
    /// (grants a USER read access to that project).
    pub async fn exists_assigned_in_project(
        pool: &PgPool,
        user_id: DbId,
        project_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM tasks WHERE assigned_user_id = $1 AND project_id = $2
             )",
        )
        .bind(user_id)
        .bind(project_id)
        .fetch_one(pool)
        .await?;
        Ok(exists.0)
    }

    /// Delete every task in a project. Returns the number of rows removed.
    ///
    /// Runs on a transaction connection: project deletion cascades through
    /// here atomically.
    pub async fn delete_by_project(
        conn: &mut PgConnection,
        project_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE project_id = $1")
            .bind(project_id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }

    /// Detach a user from every task assigned to them (set assignee to
    /// NULL, keep the tasks). Returns the number of rows touched.
    ///
    /// Runs on a transaction connection: user deletion detaches through
    /// here atomically.
    pub async fn clear_assignee(
        conn: &mut PgConnection,
        user_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE tasks SET assigned_user_id = NULL, update_date = NOW()
             WHERE assigned_user_id = $1",
        )
        .bind(user_id)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }
}
