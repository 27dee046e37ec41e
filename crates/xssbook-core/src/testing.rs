//! In-memory test doubles shared by the core unit tests.
//!
//! `MemoryStore` implements every repository trait over one set of tables so
//! services see a consistent world, the way the SQLite adapters share a pool.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use uuid::Uuid;
use xssbook_types::error::{AccountError, RepositoryError, SynthesisError};
use xssbook_types::friendship::{
    FriendRequest, FriendRequestStatus, FriendshipState, IncomingRequest, canonical_pair,
};
use xssbook_types::message::{ConversationSummary, DirectMessage, MessageView};
use xssbook_types::notification::{Notification, NotificationView};
use xssbook_types::post::{Comment, CommentView, LikeOutcome, Post, PostView};
use xssbook_types::user::{User, UserId, UserSummary};

use crate::repository::friendship::FriendshipRepository;
use crate::repository::message::MessageRepository;
use crate::repository::notification::NotificationRepository;
use crate::repository::post::PostRepository;
use crate::repository::session::SessionRepository;
use crate::repository::user::UserRepository;
use crate::responder::ReplyGenerator;
use crate::service::credential::CredentialHasher;
use crate::service::hash::ContentHasher;

pub(crate) const PERSONA_PASSWORD: &str = "password123";

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    requests: Vec<FriendRequest>,
    friends: BTreeSet<(UserId, UserId)>,
    messages: Vec<DirectMessage>,
    notifications: Vec<Notification>,
    sessions: HashMap<String, UserId>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
    likes: BTreeSet<(Uuid, UserId)>,
    reject_replies: bool,
}

impl Tables {
    fn user(&self, id: &UserId) -> Option<&User> {
        self.users.iter().find(|u| u.id == *id)
    }

    fn upsert(&mut self, request: &FriendRequest) -> Uuid {
        if let Some(existing) = self
            .requests
            .iter_mut()
            .find(|r| r.sender_id == request.sender_id && r.receiver_id == request.receiver_id)
        {
            existing.status = request.status;
            existing.created_at = request.created_at;
            return existing.id;
        }
        self.requests.push(request.clone());
        request.id
    }

    fn like_count(&self, post: &Uuid) -> u32 {
        self.likes.iter().filter(|(p, _)| p == post).count() as u32
    }

    fn post_view(&self, post: &Post) -> Option<PostView> {
        let author = self.user(&post.user_id)?;
        Some(PostView {
            id: post.id,
            user_id: post.user_id,
            content: post.content.clone(),
            image_url: post.image_url.clone(),
            video_url: post.video_url.clone(),
            is_cached: post.is_cached,
            created_at: post.created_at,
            name: author.name.clone(),
            username: author.username.clone(),
            avatar: author.avatar.clone(),
            like_count: self.like_count(&post.id),
            comment_count: self.comments.iter().filter(|c| c.post_id == post.id).count() as u32,
        })
    }

    /// Views of the posts matching `keep`, newest first.
    fn post_views(&self, keep: impl Fn(&Post, &User) -> bool) -> Vec<PostView> {
        let mut posts: Vec<&Post> = self
            .posts
            .iter()
            .filter(|p| self.user(&p.user_id).is_some_and(|u| keep(*p, u)))
            .collect();
        posts.sort_by_key(|p| std::cmp::Reverse((p.created_at, p.id)));
        posts.into_iter().filter_map(|p| self.post_view(p)).collect()
    }
}

#[derive(Clone, Default)]
pub(crate) struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    /// Insert a human account (or a persona when `persona` is set).
    pub(crate) fn add_user(&self, username: &str, persona: bool) -> User {
        let password = if persona { PERSONA_PASSWORD } else { "s3cret-pass" };
        let user = user_with_password(username, password);
        self.lock().users.push(user.clone());
        user
    }

    pub(crate) fn befriend(&self, a: &User, b: &User) {
        self.lock().friends.insert(canonical_pair(a.id, b.id));
    }

    /// Make every exchange that carries a reply fail as a whole.
    pub(crate) fn reject_replies(&self) {
        self.lock().reject_replies = true;
    }

    pub(crate) fn messages(&self) -> Vec<DirectMessage> {
        self.lock().messages.clone()
    }

    pub(crate) fn notifications_for(&self, user: &UserId) -> Vec<Notification> {
        self.lock()
            .notifications
            .iter()
            .filter(|n| n.user_id == *user)
            .cloned()
            .collect()
    }

    pub(crate) fn requests(&self) -> Vec<FriendRequest> {
        self.lock().requests.clone()
    }

    pub(crate) fn session_count(&self) -> usize {
        self.lock().sessions.len()
    }
}

/// A user whose stored hash is the `PlainHasher` encoding of `password`.
pub(crate) fn user_with_password(username: &str, password: &str) -> User {
    let mut name = username.to_string();
    if let Some(first) = name.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    User {
        id: UserId::new(),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password_hash: PlainHasher.encode(password),
        name,
        bio: String::new(),
        avatar: String::new(),
        created_at: Utc::now(),
    }
}

/// Reversible "hash" so tests can reason about stored credentials.
#[derive(Clone, Copy, Default)]
pub(crate) struct PlainHasher;

impl PlainHasher {
    fn encode(&self, secret: &str) -> String {
        format!("plain${secret}")
    }
}

impl CredentialHasher for PlainHasher {
    async fn hash_credential(&self, secret: &str) -> Result<String, AccountError> {
        Ok(self.encode(secret))
    }

    async fn verify_credential(&self, secret: &str, stored: &str) -> bool {
        !stored.is_empty() && stored == self.encode(secret)
    }
}

impl ContentHasher for PlainHasher {
    fn compute_hash(&self, content: &str) -> String {
        format!("digest:{content}")
    }
}

/// Generator that always returns the same text.
pub(crate) struct FixedGenerator(pub &'static str);

impl ReplyGenerator for FixedGenerator {
    fn reply(&self, _message: &str, _speaker_name: &str) -> Result<String, SynthesisError> {
        Ok(self.0.to_string())
    }

    fn starter(&self) -> Result<String, SynthesisError> {
        Ok(self.0.to_string())
    }
}

/// Generator that always fails.
pub(crate) struct FailingGenerator;

impl ReplyGenerator for FailingGenerator {
    fn reply(&self, _message: &str, _speaker_name: &str) -> Result<String, SynthesisError> {
        Err(SynthesisError::Other("forced failure".to_string()))
    }

    fn starter(&self) -> Result<String, SynthesisError> {
        Err(SynthesisError::RngUnavailable)
    }
}

/// User repository whose every call fails, as if the database went away.
pub(crate) struct UnreachableUsers;

impl UserRepository for UnreachableUsers {
    async fn create_user(&self, _user: &User) -> Result<(), RepositoryError> {
        Err(RepositoryError::Connection)
    }

    async fn get_user(&self, _id: &UserId) -> Result<Option<User>, RepositoryError> {
        Err(RepositoryError::Connection)
    }

    async fn get_user_by_username(&self, _username: &str) -> Result<Option<User>, RepositoryError> {
        Err(RepositoryError::Connection)
    }

    async fn list_users(&self) -> Result<Vec<User>, RepositoryError> {
        Err(RepositoryError::Connection)
    }

    async fn count_users(&self) -> Result<u64, RepositoryError> {
        Err(RepositoryError::Connection)
    }
}

// ---------------------------------------------------------------------------
// Repository implementations
// ---------------------------------------------------------------------------

impl UserRepository for MemoryStore {
    async fn create_user(&self, user: &User) -> Result<(), RepositoryError> {
        let mut tables = self.lock();
        if tables
            .users
            .iter()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(RepositoryError::Conflict(format!(
                "user '{}' already exists",
                user.username
            )));
        }
        tables.users.push(user.clone());
        Ok(())
    }

    async fn get_user(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.lock().user(id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, RepositoryError> {
        let mut users = self.lock().users.clone();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(users)
    }

    async fn count_users(&self) -> Result<u64, RepositoryError> {
        Ok(self.lock().users.len() as u64)
    }
}

impl FriendshipRepository for MemoryStore {
    async fn friendship_state(
        &self,
        user: &UserId,
        other: &UserId,
    ) -> Result<FriendshipState, RepositoryError> {
        let tables = self.lock();
        if tables.friends.contains(&canonical_pair(*user, *other)) {
            return Ok(FriendshipState::Friends);
        }
        let pending = |s: &UserId, r: &UserId| {
            tables.requests.iter().any(|req| {
                req.sender_id == *s && req.receiver_id == *r && req.status == FriendRequestStatus::Pending
            })
        };
        if pending(user, other) {
            Ok(FriendshipState::RequestSent)
        } else if pending(other, user) {
            Ok(FriendshipState::RequestReceived)
        } else {
            Ok(FriendshipState::None)
        }
    }

    async fn upsert_request(&self, request: &FriendRequest) -> Result<Uuid, RepositoryError> {
        Ok(self.lock().upsert(request))
    }

    async fn open_request(
        &self,
        request: &FriendRequest,
        notice: &Notification,
    ) -> Result<Uuid, RepositoryError> {
        let mut tables = self.lock();
        let pending = FriendRequest {
            status: FriendRequestStatus::Pending,
            ..request.clone()
        };
        let id = tables.upsert(&pending);
        tables.notifications.push(notice.clone());
        Ok(id)
    }

    async fn accept_request(
        &self,
        request: &FriendRequest,
        notice: &Notification,
    ) -> Result<Uuid, RepositoryError> {
        let mut tables = self.lock();
        let accepted = FriendRequest {
            status: FriendRequestStatus::Accepted,
            ..request.clone()
        };
        let id = tables.upsert(&accepted);
        tables
            .friends
            .insert(canonical_pair(request.sender_id, request.receiver_id));
        tables.notifications.push(notice.clone());
        Ok(id)
    }

    async fn find_request(
        &self,
        sender: &UserId,
        receiver: &UserId,
    ) -> Result<Option<FriendRequest>, RepositoryError> {
        Ok(self
            .lock()
            .requests
            .iter()
            .find(|r| r.sender_id == *sender && r.receiver_id == *receiver)
            .cloned())
    }

    async fn set_request_status(
        &self,
        id: &Uuid,
        status: FriendRequestStatus,
    ) -> Result<(), RepositoryError> {
        let mut tables = self.lock();
        let request = tables
            .requests
            .iter_mut()
            .find(|r| r.id == *id)
            .ok_or(RepositoryError::NotFound)?;
        request.status = status;
        Ok(())
    }

    async fn pending_requests_for(
        &self,
        receiver: &UserId,
    ) -> Result<Vec<IncomingRequest>, RepositoryError> {
        let tables = self.lock();
        let mut incoming: Vec<IncomingRequest> = tables
            .requests
            .iter()
            .filter(|r| r.receiver_id == *receiver && r.status == FriendRequestStatus::Pending)
            .filter_map(|r| {
                tables.user(&r.sender_id).map(|sender| IncomingRequest {
                    id: r.id,
                    sender_id: sender.id,
                    name: sender.name.clone(),
                    username: sender.username.clone(),
                    avatar: sender.avatar.clone(),
                    created_at: r.created_at,
                })
            })
            .collect();
        incoming.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(incoming)
    }

    async fn add_friendship(&self, a: &UserId, b: &UserId) -> Result<(), RepositoryError> {
        self.lock().friends.insert(canonical_pair(*a, *b));
        Ok(())
    }

    async fn friends_of(&self, user: &UserId) -> Result<Vec<UserSummary>, RepositoryError> {
        let tables = self.lock();
        let mut friends: Vec<UserSummary> = tables
            .friends
            .iter()
            .filter_map(|(a, b)| match (a == user, b == user) {
                (true, _) => Some(b),
                (_, true) => Some(a),
                _ => None,
            })
            .filter_map(|id| tables.user(id).map(User::summary))
            .collect();
        friends.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(friends)
    }

    async fn suggestions_for(
        &self,
        user: &UserId,
        limit: u32,
    ) -> Result<Vec<UserSummary>, RepositoryError> {
        let tables = self.lock();
        let mut users: Vec<&User> = tables
            .users
            .iter()
            .filter(|u| u.id != *user)
            .filter(|u| !tables.friends.contains(&canonical_pair(*user, u.id)))
            .filter(|u| {
                !tables.requests.iter().any(|r| {
                    r.sender_id == *user
                        && r.receiver_id == u.id
                        && r.status == FriendRequestStatus::Pending
                })
            })
            .collect();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(users
            .into_iter()
            .take(limit as usize)
            .map(User::summary)
            .collect())
    }
}

impl MessageRepository for MemoryStore {
    async fn insert_exchange(
        &self,
        message: &DirectMessage,
        reply: Option<&DirectMessage>,
    ) -> Result<(), RepositoryError> {
        let mut tables = self.lock();
        if reply.is_some() && tables.reject_replies {
            return Err(RepositoryError::Query("reply rejected".to_string()));
        }
        tables.messages.push(message.clone());
        tables.messages.extend(reply.cloned());
        Ok(())
    }

    async fn insert_opening(&self, message: &DirectMessage) -> Result<bool, RepositoryError> {
        let mut tables = self.lock();
        if tables
            .messages
            .iter()
            .any(|m| m.is_between(&message.sender_id, &message.receiver_id))
        {
            return Ok(false);
        }
        tables.messages.push(message.clone());
        Ok(true)
    }

    async fn count_messages_between(&self, a: &UserId, b: &UserId) -> Result<u64, RepositoryError> {
        Ok(self
            .lock()
            .messages
            .iter()
            .filter(|m| m.is_between(a, b))
            .count() as u64)
    }

    async fn conversation(&self, a: &UserId, b: &UserId) -> Result<Vec<MessageView>, RepositoryError> {
        let tables = self.lock();
        let mut messages: Vec<&DirectMessage> =
            tables.messages.iter().filter(|m| m.is_between(a, b)).collect();
        messages.sort_by_key(|m| (m.created_at, m.id));
        Ok(messages
            .into_iter()
            .filter_map(|m| {
                let sender = tables.user(&m.sender_id)?;
                let receiver = tables.user(&m.receiver_id)?;
                Some(MessageView {
                    id: m.id,
                    content: m.content.clone(),
                    sender_id: m.sender_id,
                    receiver_id: m.receiver_id,
                    sender_name: sender.name.clone(),
                    sender_username: sender.username.clone(),
                    sender_avatar: sender.avatar.clone(),
                    receiver_name: receiver.name.clone(),
                    receiver_username: receiver.username.clone(),
                    receiver_avatar: receiver.avatar.clone(),
                    is_read: m.is_read,
                    timestamp: m.created_at,
                })
            })
            .collect())
    }

    async fn mark_read(&self, sender: &UserId, receiver: &UserId) -> Result<u64, RepositoryError> {
        let mut changed = 0;
        for message in self.lock().messages.iter_mut() {
            if message.sender_id == *sender && message.receiver_id == *receiver && !message.is_read {
                message.is_read = true;
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn conversations_for(
        &self,
        user: &UserId,
    ) -> Result<Vec<ConversationSummary>, RepositoryError> {
        let tables = self.lock();
        let mut latest: BTreeMap<UserId, (&DirectMessage, u32)> = BTreeMap::new();
        for message in tables
            .messages
            .iter()
            .filter(|m| m.sender_id == *user || m.receiver_id == *user)
        {
            let other = if message.sender_id == *user {
                message.receiver_id
            } else {
                message.sender_id
            };
            let unread = u32::from(message.sender_id == other && !message.is_read);
            latest
                .entry(other)
                .and_modify(|(last, count)| {
                    if (message.created_at, message.id) > (last.created_at, last.id) {
                        *last = message;
                    }
                    *count += unread;
                })
                .or_insert((message, unread));
        }

        let mut summaries: Vec<ConversationSummary> = latest
            .into_iter()
            .filter_map(|(other, (last, unread_count))| {
                tables.user(&other).map(|u| ConversationSummary {
                    other_user: u.summary(),
                    last_message: last.content.clone(),
                    last_message_time: last.created_at,
                    unread_count,
                })
            })
            .collect();
        summaries.sort_by(|a, b| b.last_message_time.cmp(&a.last_message_time));
        Ok(summaries)
    }
}

impl NotificationRepository for MemoryStore {
    async fn create_notification(&self, notification: &Notification) -> Result<(), RepositoryError> {
        self.lock().notifications.push(notification.clone());
        Ok(())
    }

    async fn recent_for(
        &self,
        user: &UserId,
        limit: u32,
    ) -> Result<Vec<NotificationView>, RepositoryError> {
        let tables = self.lock();
        let mut owned: Vec<&Notification> = tables
            .notifications
            .iter()
            .filter(|n| n.user_id == *user)
            .collect();
        owned.sort_by_key(|n| std::cmp::Reverse((n.created_at, n.id)));
        Ok(owned
            .into_iter()
            .take(limit as usize)
            .map(|n| {
                let related = n.related_user_id.and_then(|id| tables.user(&id));
                NotificationView {
                    id: n.id,
                    kind: n.kind,
                    message: n.message.clone(),
                    is_read: n.is_read,
                    created_at: n.created_at,
                    related_user_name: related.map(|u| u.name.clone()),
                    related_user_avatar: related.map(|u| u.avatar.clone()),
                }
            })
            .collect())
    }

    async fn mark_notification_read(&self, id: &Uuid, user: &UserId) -> Result<bool, RepositoryError> {
        let mut tables = self.lock();
        match tables
            .notifications
            .iter_mut()
            .find(|n| n.id == *id && n.user_id == *user)
        {
            Some(notification) => {
                notification.is_read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl PostRepository for MemoryStore {
    async fn create_post(&self, post: &Post) -> Result<(), RepositoryError> {
        self.lock().posts.push(post.clone());
        Ok(())
    }

    async fn get_post(&self, id: &Uuid) -> Result<Option<PostView>, RepositoryError> {
        let tables = self.lock();
        Ok(tables
            .posts
            .iter()
            .find(|p| p.id == *id)
            .and_then(|p| tables.post_view(p)))
    }

    async fn feed(&self) -> Result<Vec<PostView>, RepositoryError> {
        Ok(self.lock().post_views(|_, _| true))
    }

    async fn posts_by(&self, user: &UserId) -> Result<Vec<PostView>, RepositoryError> {
        Ok(self.lock().post_views(|p, _| p.user_id == *user))
    }

    async fn search_posts(&self, query: &str) -> Result<Vec<PostView>, RepositoryError> {
        let needle = query.to_ascii_lowercase();
        Ok(self.lock().post_views(|p, author| {
            p.content.to_ascii_lowercase().contains(&needle)
                || author.name.to_ascii_lowercase().contains(&needle)
        }))
    }

    async fn count_posts(&self) -> Result<u64, RepositoryError> {
        Ok(self.lock().posts.len() as u64)
    }

    async fn add_comment(&self, comment: &Comment) -> Result<(), RepositoryError> {
        self.lock().comments.push(comment.clone());
        Ok(())
    }

    async fn comments_for(&self, post: &Uuid) -> Result<Vec<CommentView>, RepositoryError> {
        let tables = self.lock();
        let mut comments: Vec<&Comment> =
            tables.comments.iter().filter(|c| c.post_id == *post).collect();
        comments.sort_by_key(|c| (c.created_at, c.id));
        Ok(comments
            .into_iter()
            .filter_map(|c| {
                let author = tables.user(&c.user_id)?;
                Some(CommentView {
                    id: c.id,
                    content: c.content.clone(),
                    name: author.name.clone(),
                    username: author.username.clone(),
                    avatar: author.avatar.clone(),
                    created_at: c.created_at,
                })
            })
            .collect())
    }

    async fn toggle_like(&self, post: &Uuid, user: &UserId) -> Result<LikeOutcome, RepositoryError> {
        let mut tables = self.lock();
        let key = (*post, *user);
        let liked = if tables.likes.remove(&key) {
            false
        } else {
            tables.likes.insert(key);
            true
        };
        Ok(LikeOutcome {
            liked,
            like_count: tables.like_count(post),
        })
    }
}

impl SessionRepository for MemoryStore {
    async fn create_session(&self, token_hash: &str, user: &UserId) -> Result<(), RepositoryError> {
        self.lock().sessions.insert(token_hash.to_string(), *user);
        Ok(())
    }

    async fn resolve_session(&self, token_hash: &str) -> Result<Option<UserId>, RepositoryError> {
        Ok(self.lock().sessions.get(token_hash).copied())
    }
}

/// Timestamp `secs` seconds after a fixed origin, for ordering tests.
pub(crate) fn at(secs: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(1_700_000_000 + secs, 0).unwrap()
}
