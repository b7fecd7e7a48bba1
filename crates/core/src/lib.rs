//! Pure domain layer for the taskboard backend.
//!
//! Holds the shared id/timestamp aliases, the role and task enums, the
//! error taxonomy, and the authorization policy engine. This crate performs
//! no I/O; everything here is decidable from values the caller passes in.

pub mod error;
pub mod policy;
pub mod roles;
pub mod tasks;
pub mod types;
