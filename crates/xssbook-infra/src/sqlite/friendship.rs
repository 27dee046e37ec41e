//! SQLite friendship repository implementation.
//!
//! Friend requests are keyed by the ordered (sender, receiver) pair.
//! Friendships are stored once per unordered pair with `user1_id < user2_id`.

use chrono::Utc;
use sqlx::Row;
use uuid::Uuid;
use xssbook_core::repository::friendship::FriendshipRepository;
use xssbook_types::error::RepositoryError;
use xssbook_types::friendship::{
    FriendRequest, FriendRequestStatus, FriendshipState, IncomingRequest, canonical_pair,
};
use xssbook_types::notification::Notification;
use xssbook_types::user::{UserId, UserSummary};

use super::notification::insert_notification;
use super::pool::DatabasePool;
use super::user::map_user;
use super::{format_datetime, parse_datetime, parse_user_id, parse_uuid, query_error};

/// SQLite-backed implementation of `FriendshipRepository`.
#[derive(Clone)]
pub struct SqliteFriendshipRepository {
    pool: DatabasePool,
}

impl SqliteFriendshipRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn map_request(row: &sqlx::sqlite::SqliteRow) -> Result<FriendRequest, RepositoryError> {
    let id: String = row.try_get("id").map_err(query_error)?;
    let sender_id: String = row.try_get("sender_id").map_err(query_error)?;
    let receiver_id: String = row.try_get("receiver_id").map_err(query_error)?;
    let status: String = row.try_get("status").map_err(query_error)?;
    let created_at: String = row.try_get("created_at").map_err(query_error)?;

    Ok(FriendRequest {
        id: parse_uuid(&id)?,
        sender_id: parse_user_id(&sender_id)?,
        receiver_id: parse_user_id(&receiver_id)?,
        status: status.parse().map_err(RepositoryError::Query)?,
        created_at: parse_datetime(&created_at)?,
    })
}

fn map_incoming(row: &sqlx::sqlite::SqliteRow) -> Result<IncomingRequest, RepositoryError> {
    let id: String = row.try_get("id").map_err(query_error)?;
    let sender_id: String = row.try_get("sender_id").map_err(query_error)?;
    let created_at: String = row.try_get("created_at").map_err(query_error)?;

    Ok(IncomingRequest {
        id: parse_uuid(&id)?,
        sender_id: parse_user_id(&sender_id)?,
        name: row.try_get("name").map_err(query_error)?,
        username: row.try_get("username").map_err(query_error)?,
        avatar: row.try_get("avatar").map_err(query_error)?,
        created_at: parse_datetime(&created_at)?,
    })
}

async fn upsert_on(
    conn: &mut sqlx::SqliteConnection,
    request: &FriendRequest,
) -> Result<Uuid, RepositoryError> {
    let row = sqlx::query(
        "INSERT INTO friend_requests (id, sender_id, receiver_id, status, created_at)
         VALUES (?, ?, ?, ?, ?)
         ON CONFLICT(sender_id, receiver_id)
         DO UPDATE SET status = excluded.status, created_at = excluded.created_at
         RETURNING id",
    )
    .bind(request.id.to_string())
    .bind(request.sender_id.to_string())
    .bind(request.receiver_id.to_string())
    .bind(request.status.to_string())
    .bind(format_datetime(&request.created_at))
    .fetch_one(&mut *conn)
    .await
    .map_err(query_error)?;

    let id: String = row.try_get("id").map_err(query_error)?;
    parse_uuid(&id)
}

async fn befriend_on(
    conn: &mut sqlx::SqliteConnection,
    a: &UserId,
    b: &UserId,
) -> Result<(), RepositoryError> {
    let (first, second) = canonical_pair(*a, *b);
    sqlx::query("INSERT OR IGNORE INTO friends (user1_id, user2_id, created_at) VALUES (?, ?, ?)")
        .bind(first.to_string())
        .bind(second.to_string())
        .bind(format_datetime(&Utc::now()))
        .execute(&mut *conn)
        .await
        .map_err(query_error)?;
    Ok(())
}

impl FriendshipRepository for SqliteFriendshipRepository {
    async fn friendship_state(
        &self,
        user: &UserId,
        other: &UserId,
    ) -> Result<FriendshipState, RepositoryError> {
        let (first, second) = canonical_pair(*user, *other);
        let row = sqlx::query(
            "SELECT
                EXISTS(SELECT 1 FROM friends WHERE user1_id = ? AND user2_id = ?) AS friends,
                EXISTS(SELECT 1 FROM friend_requests
                       WHERE sender_id = ? AND receiver_id = ? AND status = 'pending') AS sent,
                EXISTS(SELECT 1 FROM friend_requests
                       WHERE sender_id = ? AND receiver_id = ? AND status = 'pending') AS received",
        )
        .bind(first.to_string())
        .bind(second.to_string())
        .bind(user.to_string())
        .bind(other.to_string())
        .bind(other.to_string())
        .bind(user.to_string())
        .fetch_one(&self.pool.reader)
        .await
        .map_err(query_error)?;

        let friends: bool = row.try_get("friends").map_err(query_error)?;
        let sent: bool = row.try_get("sent").map_err(query_error)?;
        let received: bool = row.try_get("received").map_err(query_error)?;

        Ok(if friends {
            FriendshipState::Friends
        } else if sent {
            FriendshipState::RequestSent
        } else if received {
            FriendshipState::RequestReceived
        } else {
            FriendshipState::None
        })
    }

    async fn upsert_request(&self, request: &FriendRequest) -> Result<Uuid, RepositoryError> {
        let mut conn = self.pool.writer.acquire().await.map_err(query_error)?;
        upsert_on(&mut conn, request).await
    }

    async fn open_request(
        &self,
        request: &FriendRequest,
        notice: &Notification,
    ) -> Result<Uuid, RepositoryError> {
        let pending = FriendRequest {
            status: FriendRequestStatus::Pending,
            ..request.clone()
        };
        let mut tx = self.pool.writer.begin().await.map_err(query_error)?;
        let id = upsert_on(&mut tx, &pending).await?;
        insert_notification(&mut tx, notice).await?;
        tx.commit().await.map_err(query_error)?;
        Ok(id)
    }

    async fn accept_request(
        &self,
        request: &FriendRequest,
        notice: &Notification,
    ) -> Result<Uuid, RepositoryError> {
        let accepted = FriendRequest {
            status: FriendRequestStatus::Accepted,
            ..request.clone()
        };
        let mut tx = self.pool.writer.begin().await.map_err(query_error)?;
        let id = upsert_on(&mut tx, &accepted).await?;
        befriend_on(&mut tx, &request.sender_id, &request.receiver_id).await?;
        insert_notification(&mut tx, notice).await?;
        tx.commit().await.map_err(query_error)?;
        Ok(id)
    }

    async fn find_request(
        &self,
        sender: &UserId,
        receiver: &UserId,
    ) -> Result<Option<FriendRequest>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM friend_requests WHERE sender_id = ? AND receiver_id = ?")
            .bind(sender.to_string())
            .bind(receiver.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        row.as_ref().map(map_request).transpose()
    }

    async fn set_request_status(
        &self,
        id: &Uuid,
        status: FriendRequestStatus,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE friend_requests SET status = ? WHERE id = ?")
            .bind(status.to_string())
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn pending_requests_for(
        &self,
        receiver: &UserId,
    ) -> Result<Vec<IncomingRequest>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT fr.id, fr.sender_id, u.name, u.username, u.avatar, fr.created_at
             FROM friend_requests fr
             JOIN users u ON fr.sender_id = u.id
             WHERE fr.receiver_id = ? AND fr.status = 'pending'
             ORDER BY fr.created_at DESC, fr.id DESC",
        )
        .bind(receiver.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        rows.iter().map(map_incoming).collect()
    }

    async fn add_friendship(&self, a: &UserId, b: &UserId) -> Result<(), RepositoryError> {
        let mut conn = self.pool.writer.acquire().await.map_err(query_error)?;
        befriend_on(&mut conn, a, b).await
    }

    async fn friends_of(&self, user: &UserId) -> Result<Vec<UserSummary>, RepositoryError> {
        let id = user.to_string();
        let rows = sqlx::query(
            "SELECT u.* FROM friends f
             JOIN users u
               ON u.id = CASE WHEN f.user1_id = ? THEN f.user2_id ELSE f.user1_id END
             WHERE f.user1_id = ? OR f.user2_id = ?
             ORDER BY u.name, u.id",
        )
        .bind(&id)
        .bind(&id)
        .bind(&id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        rows.iter()
            .map(|row| map_user(row).map(|u| u.summary()))
            .collect()
    }

    async fn suggestions_for(
        &self,
        user: &UserId,
        limit: u32,
    ) -> Result<Vec<UserSummary>, RepositoryError> {
        let id = user.to_string();
        let rows = sqlx::query(
            "SELECT u.* FROM users u
             WHERE u.id != ?
               AND NOT EXISTS (
                   SELECT 1 FROM friends f
                   WHERE (f.user1_id = u.id AND f.user2_id = ?)
                      OR (f.user2_id = u.id AND f.user1_id = ?))
               AND NOT EXISTS (
                   SELECT 1 FROM friend_requests fr
                   WHERE fr.sender_id = ? AND fr.receiver_id = u.id AND fr.status = 'pending')
             ORDER BY u.name, u.id
             LIMIT ?",
        )
        .bind(&id)
        .bind(&id)
        .bind(&id)
        .bind(&id)
        .bind(i64::from(limit))
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        rows.iter()
            .map(|row| map_user(row).map(|u| u.summary()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::notification::SqliteNotificationRepository;
    use crate::sqlite::test_support::{make_user, test_pool};
    use crate::sqlite::user::SqliteUserRepository;
    use xssbook_core::repository::notification::NotificationRepository;
    use xssbook_core::repository::user::UserRepository;
    use xssbook_types::notification::NotificationKind;
    use xssbook_types::user::User;

    async fn setup(names: &[&str]) -> (SqliteFriendshipRepository, Vec<User>, tempfile::TempDir) {
        let (pool, dir) = test_pool().await;
        let users_repo = SqliteUserRepository::new(pool.clone());
        let mut users = Vec::new();
        for name in names {
            let user = make_user(&name.to_lowercase(), name);
            users_repo.create_user(&user).await.unwrap();
            users.push(user);
        }
        (SqliteFriendshipRepository::new(pool), users, dir)
    }

    #[tokio::test]
    async fn test_state_transitions() {
        let (repo, users, _dir) = setup(&["Alice", "Bob"]).await;
        let (a, b) = (users[0].id, users[1].id);

        assert_eq!(repo.friendship_state(&a, &b).await.unwrap(), FriendshipState::None);

        let id = repo.upsert_request(&FriendRequest::pending(a, b)).await.unwrap();
        assert_eq!(repo.friendship_state(&a, &b).await.unwrap(), FriendshipState::RequestSent);
        assert_eq!(repo.friendship_state(&b, &a).await.unwrap(), FriendshipState::RequestReceived);

        repo.set_request_status(&id, FriendRequestStatus::Accepted).await.unwrap();
        repo.add_friendship(&b, &a).await.unwrap();
        assert_eq!(repo.friendship_state(&a, &b).await.unwrap(), FriendshipState::Friends);
        assert_eq!(repo.friendship_state(&b, &a).await.unwrap(), FriendshipState::Friends);
    }

    #[tokio::test]
    async fn test_upsert_reopens_declined_request() {
        let (repo, users, _dir) = setup(&["Alice", "Bob"]).await;
        let (a, b) = (users[0].id, users[1].id);

        let first = repo.upsert_request(&FriendRequest::pending(a, b)).await.unwrap();
        repo.set_request_status(&first, FriendRequestStatus::Declined).await.unwrap();
        assert_eq!(repo.friendship_state(&a, &b).await.unwrap(), FriendshipState::None);

        let second = repo.upsert_request(&FriendRequest::pending(a, b)).await.unwrap();
        assert_eq!(first, second);
        let stored = repo.find_request(&a, &b).await.unwrap().unwrap();
        assert_eq!(stored.status, FriendRequestStatus::Pending);
    }

    #[tokio::test]
    async fn test_set_status_unknown_id() {
        let (repo, _users, _dir) = setup(&[]).await;
        let err = repo
            .set_request_status(&Uuid::now_v7(), FriendRequestStatus::Accepted)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_pending_requests_join_sender() {
        let (repo, users, _dir) = setup(&["Alice", "Bob", "Carol"]).await;
        repo.upsert_request(&FriendRequest::pending(users[0].id, users[2].id)).await.unwrap();
        repo.upsert_request(&FriendRequest::pending(users[1].id, users[2].id)).await.unwrap();

        let pending = repo.pending_requests_for(&users[2].id).await.unwrap();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].name, "Bob");
        assert_eq!(pending[1].username, "alice");
    }

    #[tokio::test]
    async fn test_friends_and_suggestions() {
        let (repo, users, _dir) = setup(&["Alice", "Bob", "Carol", "Dave"]).await;
        let alice = users[0].id;
        repo.add_friendship(&alice, &users[2].id).await.unwrap();
        repo.add_friendship(&users[2].id, &alice).await.unwrap();
        repo.upsert_request(&FriendRequest::pending(alice, users[3].id)).await.unwrap();

        let friends = repo.friends_of(&alice).await.unwrap();
        assert_eq!(friends.len(), 1);
        assert_eq!(friends[0].name, "Carol");

        let suggestions = repo.suggestions_for(&alice, 10).await.unwrap();
        let names: Vec<_> = suggestions.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Bob"]);
        assert!(repo.suggestions_for(&alice, 0).await.unwrap().is_empty());
    }

    fn notice_for(user: &User, about: &User) -> Notification {
        Notification::new(
            user.id,
            NotificationKind::FriendAccepted,
            format!("{} accepted your friend request!", about.name),
            Some(about.id),
        )
    }

    #[tokio::test]
    async fn test_accept_request_writes_all_three_rows() {
        let (pool, _dir) = test_pool().await;
        let users_repo = SqliteUserRepository::new(pool.clone());
        let (alice, bob) = (make_user("alice", "Alice"), make_user("bob", "Bob"));
        users_repo.create_user(&alice).await.unwrap();
        users_repo.create_user(&bob).await.unwrap();
        let repo = SqliteFriendshipRepository::new(pool.clone());
        let notifications = SqliteNotificationRepository::new(pool);

        let request = FriendRequest::pending(alice.id, bob.id);
        repo.accept_request(&request, &notice_for(&alice, &bob)).await.unwrap();

        assert_eq!(repo.friendship_state(&alice.id, &bob.id).await.unwrap(), FriendshipState::Friends);
        let stored = repo.find_request(&alice.id, &bob.id).await.unwrap().unwrap();
        assert_eq!(stored.status, FriendRequestStatus::Accepted);
        let notes = notifications.recent_for(&alice.id, 10).await.unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].related_user_name.as_deref(), Some("Bob"));
    }

    #[tokio::test]
    async fn test_accept_request_rolls_back_on_failure() {
        let (repo, users, _dir) = setup(&["Alice", "Bob"]).await;
        let (alice, bob) = (&users[0], &users[1]);
        repo.open_request(&FriendRequest::pending(alice.id, bob.id), &notice_for(bob, alice))
            .await
            .unwrap();

        // A notice addressed to an unknown account violates a foreign key.
        let ghost = make_user("ghost", "Ghost");
        let pending = repo.find_request(&alice.id, &bob.id).await.unwrap().unwrap();
        let err = repo.accept_request(&pending, &notice_for(&ghost, bob)).await;
        assert!(err.is_err());

        assert_eq!(
            repo.friendship_state(&alice.id, &bob.id).await.unwrap(),
            FriendshipState::RequestSent
        );
        assert!(repo.friends_of(&alice.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_open_request_rolls_back_on_failure() {
        let (repo, users, _dir) = setup(&["Alice", "Bob"]).await;
        let (alice, bob) = (&users[0], &users[1]);
        let ghost = make_user("ghost", "Ghost");

        let err = repo
            .open_request(&FriendRequest::pending(alice.id, bob.id), &notice_for(&ghost, alice))
            .await;
        assert!(err.is_err());
        assert!(repo.find_request(&alice.id, &bob.id).await.unwrap().is_none());
    }
}
