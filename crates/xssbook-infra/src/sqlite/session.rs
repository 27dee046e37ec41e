//! SQLite session repository implementation.

use chrono::Utc;
use sqlx::Row;
use xssbook_core::repository::session::SessionRepository;
use xssbook_types::error::RepositoryError;
use xssbook_types::user::UserId;

use super::pool::DatabasePool;
use super::{format_datetime, parse_user_id, query_error};

/// SQLite-backed implementation of `SessionRepository`.
#[derive(Clone)]
pub struct SqliteSessionRepository {
    pool: DatabasePool,
}

impl SqliteSessionRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

impl SessionRepository for SqliteSessionRepository {
    async fn create_session(&self, token_hash: &str, user: &UserId) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO sessions (token_hash, user_id, created_at) VALUES (?, ?, ?)")
            .bind(token_hash)
            .bind(user.to_string())
            .bind(format_datetime(&Utc::now()))
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;
        Ok(())
    }

    async fn resolve_session(&self, token_hash: &str) -> Result<Option<UserId>, RepositoryError> {
        let row = sqlx::query("SELECT user_id FROM sessions WHERE token_hash = ?")
            .bind(token_hash)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        match row {
            Some(row) => {
                let id: String = row.try_get("user_id").map_err(query_error)?;
                Ok(Some(parse_user_id(&id)?))
            }
            None => Ok(None),
        }
    }
}
