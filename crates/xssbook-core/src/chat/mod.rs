//! Direct messaging between friends.
//!
//! `ConversationCoordinator` owns the send / start / read flows and the
//! persona auto-reply. A conversation is not an entity of its own: it is the
//! set of messages exchanged by an unordered pair of users.

pub mod coordinator;

pub use coordinator::ConversationCoordinator;
