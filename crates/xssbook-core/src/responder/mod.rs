//! Canned-response engine that speaks for persona accounts.
//!
//! `rules` holds the immutable pattern tables; `engine` evaluates them in
//! priority order and owns the injected random source. The `ReplyGenerator`
//! trait is the seam the conversation coordinator depends on.

pub mod engine;
pub mod rules;

use xssbook_types::error::SynthesisError;

pub use engine::{Reply, ResponseEngine};
pub use rules::{RuleCategory, TimeOfDay};

/// Speaker name used when the caller has no real name to offer.
/// Fallback replies are never personalized with it.
pub const DEFAULT_SPEAKER_NAME: &str = "friend";

/// Reply persisted when synthesis fails for an inbound message.
pub const FALLBACK_REPLY: &str = "That's interesting! Tell me more about that.";

/// Starter persisted when synthesis fails for a new conversation.
pub const FALLBACK_STARTER: &str = "Hey! How's it going?";

/// Source of synthetic persona messages.
pub trait ReplyGenerator: Send + Sync {
    /// Reply to `message`, speaking to `speaker_name`.
    fn reply(&self, message: &str, speaker_name: &str) -> Result<String, SynthesisError>;

    /// Open a new conversation.
    fn starter(&self) -> Result<String, SynthesisError>;
}

impl<G: ReplyGenerator + ?Sized> ReplyGenerator for std::sync::Arc<G> {
    fn reply(&self, message: &str, speaker_name: &str) -> Result<String, SynthesisError> {
        (**self).reply(message, speaker_name)
    }

    fn starter(&self) -> Result<String, SynthesisError> {
        (**self).starter()
    }
}
