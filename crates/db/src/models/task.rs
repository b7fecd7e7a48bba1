//! Task entity model and DTOs.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use taskboard_core::roles::Role;
use taskboard_core::tasks::{Priority, TaskStatus};
use taskboard_core::types::{DbId, Timestamp};

use crate::models::project::ProjectResponse;
use crate::models::user::UserResponse;

/// Full task row from the `tasks` table.
#[derive(Debug, Clone, FromRow)]
pub struct Task {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
    #[sqlx(try_from = "String")]
    pub priority: Priority,
    pub project_id: DbId,
    pub assigned_user_id: Option<DbId>,
    pub create_date: Timestamp,
    pub update_date: Timestamp,
}

/// Input for inserting a new task. The project and assignee ids are
/// resolved (and the assignee's role checked) by the service layer before
/// this struct is built.
#[derive(Debug)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
    pub project_id: DbId,
    pub assigned_user_id: Option<DbId>,
}

/// Caller-mutable task fields for a full update. The project reference is
/// immutable and deliberately absent.
#[derive(Debug)]
pub struct UpdateTask {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
    pub assigned_user_id: Option<DbId>,
}

/// Flat join row: task columns plus its project's columns, the project
/// owner's projection, and the optional assignee's projection.
#[derive(Debug, Clone)]
pub struct TaskDetail {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
    pub create_date: Timestamp,
    pub update_date: Timestamp,

    pub project_id: DbId,
    pub project_name: String,
    pub project_description: Option<String>,
    pub project_create_date: Timestamp,
    pub project_update_date: Timestamp,
    pub owner_id: DbId,
    pub owner_email: String,
    pub owner_role: Role,

    pub assignee_id: Option<DbId>,
    pub assignee_email: Option<String>,
    pub assignee_role: Option<Role>,
}

fn parse_enum_column<T>(raw: String, index: &str) -> Result<T, sqlx::Error>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.parse().map_err(|e: T::Err| sqlx::Error::ColumnDecode {
        index: index.into(),
        source: Box::new(e),
    })
}

impl FromRow<'_, PgRow> for TaskDetail {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let status: String = row.try_get("status")?;
        let priority: String = row.try_get("priority")?;
        let owner_role: String = row.try_get("owner_role")?;
        let assignee_role: Option<String> = row.try_get("assignee_role")?;

        Ok(Self {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            status: parse_enum_column(status, "status")?,
            due_date: row.try_get("due_date")?,
            priority: parse_enum_column(priority, "priority")?,
            create_date: row.try_get("create_date")?,
            update_date: row.try_get("update_date")?,
            project_id: row.try_get("project_id")?,
            project_name: row.try_get("project_name")?,
            project_description: row.try_get("project_description")?,
            project_create_date: row.try_get("project_create_date")?,
            project_update_date: row.try_get("project_update_date")?,
            owner_id: row.try_get("owner_id")?,
            owner_email: row.try_get("owner_email")?,
            owner_role: parse_enum_column(owner_role, "owner_role")?,
            assignee_id: row.try_get("assignee_id")?,
            assignee_email: row.try_get("assignee_email")?,
            assignee_role: assignee_role
                .map(|r| parse_enum_column(r, "assignee_role"))
                .transpose()?,
        })
    }
}

/// Task payload returned to API clients, with the project (and its owner)
/// and the optional assignee nested as reduced projections.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
    pub project: ProjectResponse,
    pub assigned_user: Option<UserResponse>,
    pub create_date: Timestamp,
    pub update_date: Timestamp,
}

impl From<TaskDetail> for TaskResponse {
    fn from(detail: TaskDetail) -> Self {
        let assigned_user = match (detail.assignee_id, detail.assignee_email, detail.assignee_role)
        {
            (Some(id), Some(email), Some(role)) => Some(UserResponse { id, email, role }),
            _ => None,
        };

        Self {
            id: detail.id,
            title: detail.title,
            description: detail.description,
            status: detail.status,
            due_date: detail.due_date,
            priority: detail.priority,
            project: ProjectResponse {
                id: detail.project_id,
                name: detail.project_name,
                description: detail.project_description,
                owner: UserResponse {
                    id: detail.owner_id,
                    email: detail.owner_email,
                    role: detail.owner_role,
                },
                create_date: detail.project_create_date,
                update_date: detail.project_update_date,
            },
            assigned_user,
            create_date: detail.create_date,
            update_date: detail.update_date,
        }
    }
}
