//! Shared primitive aliases.

/// Database primary key type (BIGSERIAL).
pub type DbId = i64;

/// UTC timestamp as stored in TIMESTAMPTZ columns.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
