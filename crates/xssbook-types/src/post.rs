//! Wall posts, comments and likes.
//!
//! Post and comment bodies are run through a configurable `SanitizerKind`
//! before they are stored and are returned exactly as stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::user::UserId;

/// Which content filter a write path applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SanitizerKind {
    /// Store content verbatim.
    #[default]
    None,
    /// Strip exact lowercase `<script>` and `</script>` tags.
    Basic,
    /// Escape angle brackets only.
    Partial,
    /// Strip a fixed list of exact lowercase tags.
    Blacklist,
}

impl fmt::Display for SanitizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SanitizerKind::None => write!(f, "none"),
            SanitizerKind::Basic => write!(f, "basic"),
            SanitizerKind::Partial => write!(f, "partial"),
            SanitizerKind::Blacklist => write!(f, "blacklist"),
        }
    }
}

impl FromStr for SanitizerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(SanitizerKind::None),
            "basic" => Ok(SanitizerKind::Basic),
            "partial" => Ok(SanitizerKind::Partial),
            "blacklist" => Ok(SanitizerKind::Blacklist),
            other => Err(format!("invalid sanitizer: '{other}'")),
        }
    }
}

/// A post on a user's wall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub user_id: UserId,
    pub content: String,
    pub image_url: String,
    pub video_url: String,
    /// Seeded content rather than something a user wrote.
    pub is_cached: bool,
    pub created_at: DateTime<Utc>,
}

impl Post {
    pub fn new(
        user_id: UserId,
        content: impl Into<String>,
        image_url: impl Into<String>,
        video_url: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            content: content.into(),
            image_url: image_url.into(),
            video_url: video_url.into(),
            is_cached: false,
            created_at: Utc::now(),
        }
    }
}

/// A post joined with its author and engagement counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostView {
    pub id: Uuid,
    pub user_id: UserId,
    pub content: String,
    pub image_url: String,
    pub video_url: String,
    pub is_cached: bool,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub username: String,
    pub avatar: String,
    pub like_count: u32,
    pub comment_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: UserId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(post_id: Uuid, user_id: UserId, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            post_id,
            user_id,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// A comment with its author's display details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentView {
    pub id: Uuid,
    pub content: String,
    pub name: String,
    pub username: String,
    pub avatar: String,
    pub created_at: DateTime<Utc>,
}

/// Body of a create-post request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
}

/// Body of an add-comment request. The post comes from the path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddCommentRequest {
    #[serde(default)]
    pub content: Option<String>,
}

/// State of the caller's like after a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeOutcome {
    pub liked: bool,
    pub like_count: u32,
}
