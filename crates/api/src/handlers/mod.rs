//! HTTP handlers, one module per resource.
//!
//! Handlers validate the request body, unpack the authenticated caller,
//! and delegate to the service layer; no authorization decisions are made
//! here beyond the role-gate extractors.

pub mod auth;
pub mod project;
pub mod task;
pub mod user;
