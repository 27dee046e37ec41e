//! SQLite post, comment and like repository implementation.

use chrono::Utc;
use sqlx::Row;
use uuid::Uuid;
use xssbook_core::repository::post::PostRepository;
use xssbook_types::error::RepositoryError;
use xssbook_types::post::{Comment, CommentView, LikeOutcome, Post, PostView};
use xssbook_types::user::UserId;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_user_id, parse_uuid, query_error};

/// SQLite-backed implementation of `PostRepository`.
#[derive(Clone)]
pub struct SqlitePostRepository {
    pool: DatabasePool,
}

impl SqlitePostRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Post columns joined with the author and both engagement counts.
/// Callers append a WHERE clause and ordering.
const POST_VIEW: &str = "SELECT p.id, p.user_id, p.content, p.image_url, p.video_url, p.is_cached,
            p.created_at, u.name, u.username, u.avatar,
            (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS like_count,
            (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comment_count
     FROM posts p
     JOIN users u ON p.user_id = u.id";

const NEWEST_FIRST: &str = "ORDER BY p.created_at DESC, p.id DESC";

fn count(row: &sqlx::sqlite::SqliteRow, column: &str) -> Result<u32, RepositoryError> {
    let n: i64 = row.try_get(column).map_err(query_error)?;
    Ok(u32::try_from(n).unwrap_or(u32::MAX))
}

fn map_post_view(row: &sqlx::sqlite::SqliteRow) -> Result<PostView, RepositoryError> {
    let id: String = row.try_get("id").map_err(query_error)?;
    let user_id: String = row.try_get("user_id").map_err(query_error)?;
    let created_at: String = row.try_get("created_at").map_err(query_error)?;

    Ok(PostView {
        id: parse_uuid(&id)?,
        user_id: parse_user_id(&user_id)?,
        content: row.try_get("content").map_err(query_error)?,
        image_url: row.try_get("image_url").map_err(query_error)?,
        video_url: row.try_get("video_url").map_err(query_error)?,
        is_cached: row.try_get("is_cached").map_err(query_error)?,
        created_at: parse_datetime(&created_at)?,
        name: row.try_get("name").map_err(query_error)?,
        username: row.try_get("username").map_err(query_error)?,
        avatar: row.try_get("avatar").map_err(query_error)?,
        like_count: count(row, "like_count")?,
        comment_count: count(row, "comment_count")?,
    })
}

fn map_comment_view(row: &sqlx::sqlite::SqliteRow) -> Result<CommentView, RepositoryError> {
    let id: String = row.try_get("id").map_err(query_error)?;
    let created_at: String = row.try_get("created_at").map_err(query_error)?;

    Ok(CommentView {
        id: parse_uuid(&id)?,
        content: row.try_get("content").map_err(query_error)?,
        name: row.try_get("name").map_err(query_error)?,
        username: row.try_get("username").map_err(query_error)?,
        avatar: row.try_get("avatar").map_err(query_error)?,
        created_at: parse_datetime(&created_at)?,
    })
}

impl PostRepository for SqlitePostRepository {
    async fn create_post(&self, post: &Post) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO posts (id, user_id, content, image_url, video_url, is_cached, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(post.id.to_string())
        .bind(post.user_id.to_string())
        .bind(&post.content)
        .bind(&post.image_url)
        .bind(&post.video_url)
        .bind(post.is_cached)
        .bind(format_datetime(&post.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;
        Ok(())
    }

    async fn get_post(&self, id: &Uuid) -> Result<Option<PostView>, RepositoryError> {
        let row = sqlx::query(&format!("{POST_VIEW} WHERE p.id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;
        row.as_ref().map(map_post_view).transpose()
    }

    async fn feed(&self) -> Result<Vec<PostView>, RepositoryError> {
        let rows = sqlx::query(&format!("{POST_VIEW} {NEWEST_FIRST}"))
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;
        rows.iter().map(map_post_view).collect()
    }

    async fn posts_by(&self, user: &UserId) -> Result<Vec<PostView>, RepositoryError> {
        let rows = sqlx::query(&format!("{POST_VIEW} WHERE p.user_id = ? {NEWEST_FIRST}"))
            .bind(user.to_string())
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;
        rows.iter().map(map_post_view).collect()
    }

    async fn search_posts(&self, query: &str) -> Result<Vec<PostView>, RepositoryError> {
        // `%` and `_` in the query keep their LIKE meaning.
        let rows = sqlx::query(&format!(
            "{POST_VIEW} WHERE p.content LIKE ?1 OR u.name LIKE ?1 {NEWEST_FIRST}"
        ))
        .bind(format!("%{query}%"))
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;
        rows.iter().map(map_post_view).collect()
    }

    async fn count_posts(&self) -> Result<u64, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM posts")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(query_error)?;
        let count: i64 = row.try_get("count").map_err(query_error)?;
        Ok(count as u64)
    }

    async fn add_comment(&self, comment: &Comment) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO comments (id, post_id, user_id, content, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(comment.id.to_string())
        .bind(comment.post_id.to_string())
        .bind(comment.user_id.to_string())
        .bind(&comment.content)
        .bind(format_datetime(&comment.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;
        Ok(())
    }

    async fn comments_for(&self, post: &Uuid) -> Result<Vec<CommentView>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT c.id, c.content, c.created_at, u.name, u.username, u.avatar
             FROM comments c
             JOIN users u ON c.user_id = u.id
             WHERE c.post_id = ?
             ORDER BY c.created_at ASC, c.id ASC",
        )
        .bind(post.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;
        rows.iter().map(map_comment_view).collect()
    }

    async fn toggle_like(&self, post: &Uuid, user: &UserId) -> Result<LikeOutcome, RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(query_error)?;

        let removed = sqlx::query("DELETE FROM likes WHERE post_id = ? AND user_id = ?")
            .bind(post.to_string())
            .bind(user.to_string())
            .execute(&mut *tx)
            .await
            .map_err(query_error)?
            .rows_affected();

        let liked = removed == 0;
        if liked {
            sqlx::query("INSERT INTO likes (post_id, user_id, created_at) VALUES (?, ?, ?)")
                .bind(post.to_string())
                .bind(user.to_string())
                .bind(format_datetime(&Utc::now()))
                .execute(&mut *tx)
                .await
                .map_err(query_error)?;
        }

        let row = sqlx::query("SELECT COUNT(*) AS like_count FROM likes WHERE post_id = ?")
            .bind(post.to_string())
            .fetch_one(&mut *tx)
            .await
            .map_err(query_error)?;
        let like_count = count(&row, "like_count")?;

        tx.commit().await.map_err(query_error)?;
        Ok(LikeOutcome { liked, like_count })
    }
}
