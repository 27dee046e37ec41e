//! Argon2id password hashing.
//!
//! Hashes are stored as PHC strings, so parameters and salt travel with the
//! hash. Uses the OWASP recommended parameters (19 MiB, 2 iterations, 1 lane).
//! Hashing and verification run on tokio's blocking pool.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use tracing::{debug, warn};
use xssbook_core::service::credential::CredentialHasher;
use xssbook_types::error::AccountError;

/// Argon2id implementation of `CredentialHasher`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2CredentialHasher;

impl Argon2CredentialHasher {
    pub fn new() -> Self {
        Self
    }

    fn argon2() -> Result<Argon2<'static>, AccountError> {
        let params = Params::new(19456, 2, 1, None)
            .map_err(|e| AccountError::Credential(format!("invalid argon2 params: {e}")))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    fn hash_sync(secret: &str) -> Result<String, AccountError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::argon2()?
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| AccountError::Credential(e.to_string()))?;
        Ok(hash.to_string())
    }

    fn verify_sync(secret: &str, stored: &str) -> bool {
        let parsed = match PasswordHash::new(stored) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!(error = %e, "Stored credential is not a PHC string");
                return false;
            }
        };
        // Verification reads the parameters from the PHC string itself.
        Argon2::default()
            .verify_password(secret.as_bytes(), &parsed)
            .is_ok()
    }
}

impl CredentialHasher for Argon2CredentialHasher {
    async fn hash_credential(&self, secret: &str) -> Result<String, AccountError> {
        let secret = secret.to_owned();
        tokio::task::spawn_blocking(move || Self::hash_sync(&secret))
            .await
            .map_err(|e| AccountError::Credential(format!("hashing task failed: {e}")))?
    }

    async fn verify_credential(&self, secret: &str, stored: &str) -> bool {
        let (secret, stored) = (secret.to_owned(), stored.to_owned());
        match tokio::task::spawn_blocking(move || Self::verify_sync(&secret, &stored)).await {
            Ok(verified) => verified,
            Err(e) => {
                warn!(error = %e, "Credential verification task failed");
                false
            }
        }
    }
}
