//! ContentHasher trait for digesting opaque secrets.
//!
//! The `Sha256ContentHasher` adapter lives in xssbook-infra.

/// Abstraction over content hashing.
///
/// Used by `AccountService` so session tokens are only ever stored as digests.
pub trait ContentHasher: Send + Sync {
    /// Compute a hex-encoded hash of the given content.
    fn compute_hash(&self, content: &str) -> String;
}
