//! Application services.
//!
//! Concrete structs, one per aggregate, and the only call-sites of the
//! policy module. Methods take the request's [`Caller`] explicitly wherever
//! a policy decision is involved; handlers stay thin and repositories stay
//! permission-free.
//!
//! Convention for lookup-based operations: resolve the entity first and
//! fail NotFound if absent, then evaluate permissions. Probing a
//! nonexistent id therefore never yields FORBIDDEN.
//!
//! [`Caller`]: taskboard_core::policy::Caller

pub mod project;
pub mod task;
pub mod user;

pub use project::ProjectService;
pub use task::TaskService;
pub use user::UserService;
