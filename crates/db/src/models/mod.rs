//! Row models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - Create/update input structs consumed by the repositories
//! - A response projection safe to serialize to API clients
//!
//! The `*Detail` structs are flat join rows (entity plus its referenced
//! owner/project/assignee columns) that convert into the nested response
//! shape without follow-up queries.

pub mod project;
pub mod task;
pub mod user;
