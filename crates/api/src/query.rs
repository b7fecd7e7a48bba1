//! Shared query parameter types for API handlers.

use serde::Deserialize;
use taskboard_core::tasks::{Priority, TaskStatus};

/// Default page size for list endpoints.
const DEFAULT_PAGE_SIZE: i64 = 10;
/// Upper bound on the page size a client may request.
const MAX_PAGE_SIZE: i64 = 100;

/// Generic pagination parameters (`?page=&size=`), 0-based page index.
///
/// Sanitized through [`PageParams::page`] and [`PageParams::size`]; use
/// [`PageParams::limit`] / [`PageParams::offset`] for the store query.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

impl PageParams {
    /// The requested page index, clamped to be non-negative.
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(0).max(0)
    }

    /// The requested page size, clamped into `1..=100`, default 10.
    pub fn size(&self) -> i64 {
        self.size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    /// Row limit for the backing query.
    pub fn limit(&self) -> i64 {
        self.size()
    }

    /// Row offset for the backing query.
    pub fn offset(&self) -> i64 {
        self.page() * self.size()
    }
}

/// Query parameters for `/tasks/filter` (`?status=&priority=`).
///
/// Both filters are optional and combine with AND; an unparseable enum
/// value rejects the request with 400 at extraction time.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct TaskFilterParams {
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
}
