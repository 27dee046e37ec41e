//! Session token repository trait definition.
//!
//! Tokens are never stored in plaintext: callers pass the hex digest.

use xssbook_types::error::RepositoryError;
use xssbook_types::user::UserId;

pub trait SessionRepository: Send + Sync {
    /// Store a token digest for `user`.
    fn create_session(
        &self,
        token_hash: &str,
        user: &UserId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Resolve a token digest to its user, if any.
    fn resolve_session(
        &self,
        token_hash: &str,
    ) -> impl std::future::Future<Output = Result<Option<UserId>, RepositoryError>> + Send;
}
