//! SQLite storage layer.
//!
//! Repository implementations backed by SQLite with WAL mode and split
//! read/write connection pools.

pub mod friendship;
pub mod message;
pub mod notification;
pub mod pool;
pub mod post;
pub mod session;
pub mod user;

use chrono::{DateTime, SecondsFormat, Utc};
use xssbook_types::error::RepositoryError;
use xssbook_types::user::UserId;

/// Timestamps are stored as fixed-width RFC 3339 strings so that text
/// ordering matches chronological ordering.
pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

pub(crate) fn parse_user_id(s: &str) -> Result<UserId, RepositoryError> {
    s.parse()
        .map_err(|e| RepositoryError::Query(format!("invalid user id: {e}")))
}

pub(crate) fn parse_uuid(s: &str) -> Result<uuid::Uuid, RepositoryError> {
    uuid::Uuid::parse_str(s).map_err(|e| RepositoryError::Query(format!("invalid id: {e}")))
}

pub(crate) fn query_error(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Query(e.to_string())
}
