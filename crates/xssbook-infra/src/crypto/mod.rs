//! Cryptographic adapters for XSSBook.
//!
//! - `credential`: Argon2id password hashing (also used for persona detection)
//! - `hash`: SHA-256 digests for session tokens

pub mod credential;
pub mod hash;
