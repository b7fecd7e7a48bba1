use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} not found with id: {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Parse failure for a wire-form enum value (role, task status, priority).
///
/// A distinct `std::error::Error` type so both serde-adjacent parsing and
/// sqlx column decoding can carry it as a source.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct InvalidEnumValue(pub String);

