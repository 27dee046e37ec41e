//! Friendship and friend-request types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::user::UserId;

/// Relationship between an ordered pair of users, seen from the first.
///
/// Messaging is only permitted in the `Friends` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FriendshipState {
    None,
    RequestSent,
    RequestReceived,
    Friends,
}

impl fmt::Display for FriendshipState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FriendshipState::None => write!(f, "none"),
            FriendshipState::RequestSent => write!(f, "request_sent"),
            FriendshipState::RequestReceived => write!(f, "request_received"),
            FriendshipState::Friends => write!(f, "friends"),
        }
    }
}

/// Lifecycle of a friend request row.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (status IN ('pending', 'accepted', 'declined'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FriendRequestStatus {
    Pending,
    Accepted,
    Declined,
}

impl fmt::Display for FriendRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FriendRequestStatus::Pending => write!(f, "pending"),
            FriendRequestStatus::Accepted => write!(f, "accepted"),
            FriendRequestStatus::Declined => write!(f, "declined"),
        }
    }
}

impl FromStr for FriendRequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(FriendRequestStatus::Pending),
            "accepted" => Ok(FriendRequestStatus::Accepted),
            "declined" => Ok(FriendRequestStatus::Declined),
            other => Err(format!("invalid friend request status: '{other}'")),
        }
    }
}

/// A friend request from `sender_id` to `receiver_id`.
///
/// At most one row exists per ordered pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendRequest {
    pub id: Uuid,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub status: FriendRequestStatus,
    pub created_at: DateTime<Utc>,
}

impl FriendRequest {
    pub fn pending(sender_id: UserId, receiver_id: UserId) -> Self {
        Self {
            id: Uuid::now_v7(),
            sender_id,
            receiver_id,
            status: FriendRequestStatus::Pending,
            created_at: Utc::now(),
        }
    }
}

/// A pending incoming request joined with the sender's profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingRequest {
    pub id: Uuid,
    pub sender_id: UserId,
    pub name: String,
    pub username: String,
    pub avatar: String,
    pub created_at: DateTime<Utc>,
}

/// How the receiver answers a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RespondAction {
    Accept,
    Decline,
}

impl FromStr for RespondAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "accept" => Ok(RespondAction::Accept),
            "decline" => Ok(RespondAction::Decline),
            other => Err(format!("invalid action: '{other}'")),
        }
    }
}

/// Body of a send-friend-request call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendFriendRequest {
    #[serde(default)]
    pub receiver_id: Option<UserId>,
}

/// Body of a respond-to-friend-request call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RespondFriendRequest {
    #[serde(default)]
    pub sender_id: Option<UserId>,
    /// `accept` or `decline`; anything else is rejected.
    #[serde(default)]
    pub action: Option<String>,
}

/// Result of sending a friend request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SendRequestOutcome {
    /// Request is pending; the receiver was notified.
    Sent,
    /// The receiver is a persona and accepted immediately.
    AutoAccepted,
}

/// Canonical (low, high) ordering used to store an undirected friendship.
pub fn canonical_pair(a: UserId, b: UserId) -> (UserId, UserId) {
    if a <= b { (a, b) } else { (b, a) }
}
