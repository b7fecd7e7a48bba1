//! Shared response envelope types for API handlers.

use serde::Serialize;

/// Standard page envelope for paginated list endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T: Serialize> {
    pub content: Vec<T>,
    /// 0-based page index that was served.
    pub page: i64,
    /// Page size that was applied (after clamping).
    pub size: i64,
    /// Total matching rows across all pages.
    pub total_elements: i64,
}

impl<T: Serialize> Page<T> {
    pub fn new(content: Vec<T>, page: i64, size: i64, total_elements: i64) -> Self {
        Self {
            content,
            page,
            size,
            total_elements,
        }
    }

    /// An empty page, served without a backing query.
    pub fn empty(page: i64, size: i64) -> Self {
        Self::new(Vec::new(), page, size, 0)
    }
}
