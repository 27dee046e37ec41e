//! Persona detection.
//!
//! A persona is an ordinary account whose stored credential verifies against
//! the configured placeholder password. The flag is derived on every call and
//! never cached. A human account that happens to pick the placeholder
//! password is classified as a persona as well.

use tracing::debug;
use xssbook_types::user::User;

use super::credential::CredentialHasher;

/// Decides whether an account is a synthetic persona.
pub struct PersonaDetector<H: CredentialHasher> {
    hasher: H,
    placeholder: String,
}

impl<H: CredentialHasher> PersonaDetector<H> {
    pub fn new(hasher: H, placeholder: impl Into<String>) -> Self {
        Self {
            hasher,
            placeholder: placeholder.into(),
        }
    }

    /// Fresh check of `user`'s credential against the placeholder.
    pub async fn is_persona(&self, user: &User) -> bool {
        let persona = self
            .hasher
            .verify_credential(&self.placeholder, &user.password_hash)
            .await;
        debug!(user_id = %user.id, username = %user.username, persona, "Persona check");
        persona
    }
}
