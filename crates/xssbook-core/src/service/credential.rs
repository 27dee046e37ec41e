//! Password hashing port.
//!
//! The Argon2 adapter lives in xssbook-infra. Both operations are async so
//! that memory-hard implementations can move off the async worker threads.

use xssbook_types::error::AccountError;

/// Salted password hashing and verification.
pub trait CredentialHasher: Send + Sync {
    /// Hash `secret` into a self-describing string (e.g. PHC format).
    fn hash_credential(
        &self,
        secret: &str,
    ) -> impl std::future::Future<Output = Result<String, AccountError>> + Send;

    /// Whether `secret` verifies against `stored`. Malformed hashes never verify.
    fn verify_credential(
        &self,
        secret: &str,
        stored: &str,
    ) -> impl std::future::Future<Output = bool> + Send;
}
