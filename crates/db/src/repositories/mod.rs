//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Steps that must be atomic with
//! other statements (cascade delete, assignee detach) instead take a
//! `&mut PgConnection` so the service layer can run them inside one
//! transaction.

pub mod project_repo;
pub mod task_repo;
pub mod user_repo;

pub use project_repo::ProjectRepo;
pub use task_repo::{TaskFilter, TaskRepo};
pub use user_repo::UserRepo;
