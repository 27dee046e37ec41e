//! Direct message repository trait definition.

use xssbook_types::error::RepositoryError;
use xssbook_types::message::{ConversationSummary, DirectMessage, MessageView};
use xssbook_types::user::UserId;

/// Repository trait for direct message persistence.
///
/// Every write method is atomic: either all of its rows are stored or none
/// are. No ordering is guaranteed between writes issued by concurrent callers.
pub trait MessageRepository: Send + Sync {
    /// Persist a message together with the reply it triggered, if any.
    fn insert_exchange(
        &self,
        message: &DirectMessage,
        reply: Option<&DirectMessage>,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Persist `message` only if its sender and receiver have never
    /// exchanged a message. Returns whether it was stored.
    fn insert_opening(
        &self,
        message: &DirectMessage,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Number of messages exchanged between `a` and `b` in either direction.
    fn count_messages_between(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    /// Messages between `a` and `b`, oldest first, with both parties' details.
    fn conversation(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> impl std::future::Future<Output = Result<Vec<MessageView>, RepositoryError>> + Send;

    /// Mark every message from `sender` to `receiver` as read.
    /// Returns the number of rows changed.
    fn mark_read(
        &self,
        sender: &UserId,
        receiver: &UserId,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    /// One summary per counterpart of `user`, most recent exchange first.
    fn conversations_for(
        &self,
        user: &UserId,
    ) -> impl std::future::Future<Output = Result<Vec<ConversationSummary>, RepositoryError>> + Send;
}
