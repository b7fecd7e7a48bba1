//! Project entity model and DTOs.

use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use taskboard_core::roles::Role;
use taskboard_core::types::{DbId, Timestamp};

use crate::models::user::UserResponse;

/// Full project row from the `projects` table.
#[derive(Debug, Clone, FromRow)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: DbId,
    pub create_date: Timestamp,
    pub update_date: Timestamp,
}

/// Input for inserting a new project. The owner is always the caller and
/// is passed separately by the service layer.
#[derive(Debug)]
pub struct CreateProject {
    pub name: String,
    pub description: Option<String>,
}

/// Caller-mutable project fields. Owner, id, and create_date are preserved.
#[derive(Debug)]
pub struct UpdateProject {
    pub name: String,
    pub description: Option<String>,
}

/// Flat join row: project columns plus the owner's projection columns.
#[derive(Debug, Clone)]
pub struct ProjectDetail {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: DbId,
    pub owner_email: String,
    pub owner_role: Role,
    pub create_date: Timestamp,
    pub update_date: Timestamp,
}

// Manual FromRow: the owner's role is a TEXT column that must parse into
// `Role`, which the derive cannot express for aliased join columns.
impl FromRow<'_, PgRow> for ProjectDetail {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let owner_role: String = row.try_get("owner_role")?;
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            owner_id: row.try_get("owner_id")?,
            owner_email: row.try_get("owner_email")?,
            owner_role: owner_role
                .parse()
                .map_err(|e| sqlx::Error::ColumnDecode {
                    index: "owner_role".into(),
                    source: Box::new(e),
                })?,
            create_date: row.try_get("create_date")?,
            update_date: row.try_get("update_date")?,
        })
    }
}

/// Project payload returned to API clients, with the owner nested as a
/// reduced user projection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub owner: UserResponse,
    pub create_date: Timestamp,
    pub update_date: Timestamp,
}

impl From<ProjectDetail> for ProjectResponse {
    fn from(detail: ProjectDetail) -> Self {
        Self {
            id: detail.id,
            name: detail.name,
            description: detail.description,
            owner: UserResponse {
                id: detail.owner_id,
                email: detail.owner_email,
                role: detail.owner_role,
            },
            create_date: detail.create_date,
            update_date: detail.update_date,
        }
    }
}
