//! Direct message types.
//!
//! A conversation is not an entity of its own: it is the set of messages
//! exchanged between an unordered pair of users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user::{UserId, UserSummary};

/// A single direct message between two users.
///
/// Content is stored and returned verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectMessage {
    pub id: Uuid,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl DirectMessage {
    /// Build a new unread message stamped with the current time.
    pub fn new(sender_id: UserId, receiver_id: UserId, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            sender_id,
            receiver_id,
            content: content.into(),
            is_read: false,
            created_at: Utc::now(),
        }
    }

    /// Whether this message belongs to the conversation between `a` and `b`.
    pub fn is_between(&self, a: &UserId, b: &UserId) -> bool {
        (self.sender_id == *a && self.receiver_id == *b)
            || (self.sender_id == *b && self.receiver_id == *a)
    }
}

/// A message joined with the display details of both parties.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageView {
    pub id: Uuid,
    pub content: String,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub sender_name: String,
    pub sender_username: String,
    pub sender_avatar: String,
    pub receiver_name: String,
    pub receiver_username: String,
    pub receiver_avatar: String,
    pub is_read: bool,
    pub timestamp: DateTime<Utc>,
}

/// One row of the caller's inbox: the latest exchange with a counterpart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub other_user: UserSummary,
    pub last_message: String,
    pub last_message_time: DateTime<Utc>,
    pub unread_count: u32,
}

/// Body of a send-message request. Fields are optional so that missing
/// values surface as `InvalidRequest` rather than a deserialization error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub receiver_id: Option<UserId>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Body of a start-conversation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartConversationRequest {
    #[serde(default)]
    pub user_id: Option<UserId>,
}

/// What `start_conversation` did.
/// Confirmation of a successful send.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendReceipt {
    pub message_id: Uuid,
    /// Id of the persona's reply, when the receiver is a persona.
    pub reply_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StarterOutcome {
    /// The persona opened the conversation with a starter message.
    Sent,
    /// Messages already exist between the pair; nothing was written.
    AlreadyStarted,
    /// The other user is not a persona; nothing was written.
    NotPersona,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_message_is_unread() {
        let msg = DirectMessage::new(UserId::new(), UserId::new(), "hello");
        assert!(!msg.is_read);
        assert_eq!(msg.content, "hello");
    }

    #[test]
    fn test_is_between_is_unordered() {
        let a = UserId::new();
        let b = UserId::new();
        let c = UserId::new();
        let msg = DirectMessage::new(a, b, "hi");
        assert!(msg.is_between(&a, &b));
        assert!(msg.is_between(&b, &a));
        assert!(!msg.is_between(&a, &c));
    }

    #[test]
    fn test_send_request_missing_fields_deserialize() {
        let req: SendMessageRequest = serde_json::from_str("{}").unwrap();
        assert!(req.receiver_id.is_none());
        assert!(req.content.is_none());
    }

    #[test]
    fn test_starter_outcome_serde() {
        let json = serde_json::to_string(&StarterOutcome::AlreadyStarted).unwrap();
        assert_eq!(json, "\"already_started\"");
    }
}
