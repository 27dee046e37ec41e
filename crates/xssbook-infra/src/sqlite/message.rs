//! SQLite direct message repository implementation.

use sqlx::Row;
use xssbook_core::repository::message::MessageRepository;
use xssbook_types::error::RepositoryError;
use xssbook_types::message::{ConversationSummary, DirectMessage, MessageView};
use xssbook_types::user::UserId;

use super::pool::DatabasePool;
use super::user::map_user;
use super::{format_datetime, parse_datetime, parse_user_id, parse_uuid, query_error};

/// SQLite-backed implementation of `MessageRepository`.
#[derive(Clone)]
pub struct SqliteMessageRepository {
    pool: DatabasePool,
}

impl SqliteMessageRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn map_view(row: &sqlx::sqlite::SqliteRow) -> Result<MessageView, RepositoryError> {
    let id: String = row.try_get("id").map_err(query_error)?;
    let sender_id: String = row.try_get("sender_id").map_err(query_error)?;
    let receiver_id: String = row.try_get("receiver_id").map_err(query_error)?;
    let created_at: String = row.try_get("created_at").map_err(query_error)?;

    Ok(MessageView {
        id: parse_uuid(&id)?,
        content: row.try_get("content").map_err(query_error)?,
        sender_id: parse_user_id(&sender_id)?,
        receiver_id: parse_user_id(&receiver_id)?,
        sender_name: row.try_get("sender_name").map_err(query_error)?,
        sender_username: row.try_get("sender_username").map_err(query_error)?,
        sender_avatar: row.try_get("sender_avatar").map_err(query_error)?,
        receiver_name: row.try_get("receiver_name").map_err(query_error)?,
        receiver_username: row.try_get("receiver_username").map_err(query_error)?,
        receiver_avatar: row.try_get("receiver_avatar").map_err(query_error)?,
        is_read: row.try_get("is_read").map_err(query_error)?,
        timestamp: parse_datetime(&created_at)?,
    })
}

fn map_summary(row: &sqlx::sqlite::SqliteRow) -> Result<ConversationSummary, RepositoryError> {
    let other = map_user(row)?;
    let last_time: String = row.try_get("last_message_time").map_err(query_error)?;
    let unread: i64 = row.try_get("unread_count").map_err(query_error)?;

    Ok(ConversationSummary {
        other_user: other.summary(),
        last_message: row.try_get("last_message").map_err(query_error)?,
        last_message_time: parse_datetime(&last_time)?,
        unread_count: u32::try_from(unread).unwrap_or(u32::MAX),
    })
}

async fn insert_on(
    conn: &mut sqlx::SqliteConnection,
    message: &DirectMessage,
) -> Result<(), RepositoryError> {
    sqlx::query(
        "INSERT INTO messages (id, sender_id, receiver_id, content, is_read, created_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(message.id.to_string())
    .bind(message.sender_id.to_string())
    .bind(message.receiver_id.to_string())
    .bind(&message.content)
    .bind(message.is_read)
    .bind(format_datetime(&message.created_at))
    .execute(&mut *conn)
    .await
    .map_err(query_error)?;
    Ok(())
}

impl MessageRepository for SqliteMessageRepository {
    async fn insert_exchange(
        &self,
        message: &DirectMessage,
        reply: Option<&DirectMessage>,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(query_error)?;
        insert_on(&mut tx, message).await?;
        if let Some(reply) = reply {
            insert_on(&mut tx, reply).await?;
        }
        tx.commit().await.map_err(query_error)?;
        Ok(())
    }

    async fn insert_opening(&self, message: &DirectMessage) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO messages (id, sender_id, receiver_id, content, is_read, created_at)
             SELECT ?1, ?2, ?3, ?4, ?5, ?6
             WHERE NOT EXISTS (
                 SELECT 1 FROM messages
                 WHERE (sender_id = ?2 AND receiver_id = ?3) OR (sender_id = ?3 AND receiver_id = ?2))",
        )
        .bind(message.id.to_string())
        .bind(message.sender_id.to_string())
        .bind(message.receiver_id.to_string())
        .bind(&message.content)
        .bind(message.is_read)
        .bind(format_datetime(&message.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;
        Ok(result.rows_affected() == 1)
    }

    async fn count_messages_between(&self, a: &UserId, b: &UserId) -> Result<u64, RepositoryError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS count FROM messages
             WHERE (sender_id = ?1 AND receiver_id = ?2) OR (sender_id = ?2 AND receiver_id = ?1)",
        )
        .bind(a.to_string())
        .bind(b.to_string())
        .fetch_one(&self.pool.reader)
        .await
        .map_err(query_error)?;

        let count: i64 = row.try_get("count").map_err(query_error)?;
        Ok(count as u64)
    }

    async fn conversation(&self, a: &UserId, b: &UserId) -> Result<Vec<MessageView>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT m.id, m.content, m.sender_id, m.receiver_id, m.is_read, m.created_at,
                    s.name AS sender_name, s.username AS sender_username, s.avatar AS sender_avatar,
                    r.name AS receiver_name, r.username AS receiver_username, r.avatar AS receiver_avatar
             FROM messages m
             JOIN users s ON m.sender_id = s.id
             JOIN users r ON m.receiver_id = r.id
             WHERE (m.sender_id = ?1 AND m.receiver_id = ?2) OR (m.sender_id = ?2 AND m.receiver_id = ?1)
             ORDER BY m.created_at ASC, m.id ASC",
        )
        .bind(a.to_string())
        .bind(b.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        rows.iter().map(map_view).collect()
    }

    async fn mark_read(&self, sender: &UserId, receiver: &UserId) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            "UPDATE messages SET is_read = 1 WHERE sender_id = ? AND receiver_id = ? AND is_read = 0",
        )
        .bind(sender.to_string())
        .bind(receiver.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;
        Ok(result.rows_affected())
    }

    async fn conversations_for(
        &self,
        user: &UserId,
    ) -> Result<Vec<ConversationSummary>, RepositoryError> {
        let rows = sqlx::query(
            "WITH pair AS (
                 SELECT CASE WHEN sender_id = ?1 THEN receiver_id ELSE sender_id END AS other_id,
                        id, sender_id, content, is_read, created_at
                 FROM messages
                 WHERE sender_id = ?1 OR receiver_id = ?1
             ),
             ranked AS (
                 SELECT other_id, content, created_at,
                        ROW_NUMBER() OVER (PARTITION BY other_id ORDER BY created_at DESC, id DESC) AS rn
                 FROM pair
             ),
             unread AS (
                 SELECT other_id,
                        SUM(CASE WHEN sender_id = other_id AND is_read = 0 THEN 1 ELSE 0 END) AS unread_count
                 FROM pair
                 GROUP BY other_id
             )
             SELECT u.*, r.content AS last_message, r.created_at AS last_message_time,
                    un.unread_count AS unread_count
             FROM ranked r
             JOIN unread un ON un.other_id = r.other_id
             JOIN users u ON u.id = r.other_id
             WHERE r.rn = 1
             ORDER BY r.created_at DESC",
        )
        .bind(user.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        rows.iter().map(map_summary).collect()
    }
}
