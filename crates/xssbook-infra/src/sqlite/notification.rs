//! SQLite notification repository implementation.

use sqlx::Row;
use uuid::Uuid;
use xssbook_core::repository::notification::NotificationRepository;
use xssbook_types::error::RepositoryError;
use xssbook_types::notification::{Notification, NotificationView};
use xssbook_types::user::UserId;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_uuid, query_error};

/// SQLite-backed implementation of `NotificationRepository`.
#[derive(Clone)]
pub struct SqliteNotificationRepository {
    pool: DatabasePool,
}

impl SqliteNotificationRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn map_view(row: &sqlx::sqlite::SqliteRow) -> Result<NotificationView, RepositoryError> {
    let id: String = row.try_get("id").map_err(query_error)?;
    let kind: String = row.try_get("type").map_err(query_error)?;
    let created_at: String = row.try_get("created_at").map_err(query_error)?;

    Ok(NotificationView {
        id: parse_uuid(&id)?,
        kind: kind.parse().map_err(RepositoryError::Query)?,
        message: row.try_get("message").map_err(query_error)?,
        is_read: row.try_get("is_read").map_err(query_error)?,
        created_at: parse_datetime(&created_at)?,
        related_user_name: row.try_get("related_user_name").map_err(query_error)?,
        related_user_avatar: row.try_get("related_user_avatar").map_err(query_error)?,
    })
}

/// Insert one notification row on `conn`, which may be inside a transaction.
pub(crate) async fn insert_notification(
    conn: &mut sqlx::SqliteConnection,
    notification: &Notification,
) -> Result<(), RepositoryError> {
    sqlx::query(
        "INSERT INTO notifications (id, user_id, type, message, related_user_id, is_read, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(notification.id.to_string())
    .bind(notification.user_id.to_string())
    .bind(notification.kind.to_string())
    .bind(&notification.message)
    .bind(notification.related_user_id.map(|id| id.to_string()))
    .bind(notification.is_read)
    .bind(format_datetime(&notification.created_at))
    .execute(&mut *conn)
    .await
    .map_err(query_error)?;
    Ok(())
}

impl NotificationRepository for SqliteNotificationRepository {
    async fn create_notification(&self, notification: &Notification) -> Result<(), RepositoryError> {
        let mut conn = self.pool.writer.acquire().await.map_err(query_error)?;
        insert_notification(&mut conn, notification).await
    }

    async fn recent_for(
        &self,
        user: &UserId,
        limit: u32,
    ) -> Result<Vec<NotificationView>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT n.id, n.type, n.message, n.is_read, n.created_at,
                    u.name AS related_user_name, u.avatar AS related_user_avatar
             FROM notifications n
             LEFT JOIN users u ON n.related_user_id = u.id
             WHERE n.user_id = ?
             ORDER BY n.created_at DESC, n.id DESC
             LIMIT ?",
        )
        .bind(user.to_string())
        .bind(i64::from(limit))
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        rows.iter().map(map_view).collect()
    }

    async fn mark_notification_read(&self, id: &Uuid, user: &UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("UPDATE notifications SET is_read = 1 WHERE id = ? AND user_id = ?")
            .bind(id.to_string())
            .bind(user.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;
        Ok(result.rows_affected() > 0)
    }
}
