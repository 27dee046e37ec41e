//! Account provisioning and bearer sessions.
//!
//! There is no login flow: operators create accounts and issue session
//! tokens from the CLI. Tokens are random, shown once, and stored only as a
//! `ContentHasher` digest.

use chrono::Utc;
use rand::RngCore;
use tracing::{info, warn};
use xssbook_types::error::{AccountError, RepositoryError};
use xssbook_types::friendship::FriendRequest;
use xssbook_types::user::{CreateUserRequest, User, UserId};

use crate::repository::friendship::FriendshipRepository;
use crate::repository::session::SessionRepository;
use crate::repository::user::UserRepository;

use super::credential::CredentialHasher;
use super::hash::ContentHasher;
use super::seed::{PERSONAS, SEED_FRIEND_SPAN};

/// Prefix of issued session tokens.
pub const TOKEN_PREFIX: &str = "xsb_";

/// Number of existing users that greet a new account with a friend request.
pub const WELCOME_REQUESTS: usize = 3;

/// A freshly issued session. The plaintext token is never stored.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub user_id: UserId,
    pub username: String,
}

pub struct AccountService<U, F, S, H, D>
where
    U: UserRepository,
    F: FriendshipRepository,
    S: SessionRepository,
    H: CredentialHasher,
    D: ContentHasher,
{
    users: U,
    friendships: F,
    sessions: S,
    credentials: H,
    digests: D,
    persona_password: String,
}

impl<U, F, S, H, D> AccountService<U, F, S, H, D>
where
    U: UserRepository,
    F: FriendshipRepository,
    S: SessionRepository,
    H: CredentialHasher,
    D: ContentHasher,
{
    pub fn new(
        users: U,
        friendships: F,
        sessions: S,
        credentials: H,
        digests: D,
        persona_password: impl Into<String>,
    ) -> Self {
        Self {
            users,
            friendships,
            sessions,
            credentials,
            digests,
            persona_password: persona_password.into(),
        }
    }

    /// Create the built-in personas when the users table is empty.
    ///
    /// Each persona is befriended with the next `SEED_FRIEND_SPAN` personas.
    /// Returns the number of accounts created (0 when already seeded).
    pub async fn seed_personas(&self) -> Result<usize, AccountError> {
        if self.users.count_users().await? > 0 {
            info!("Users already present, skipping persona seed");
            return Ok(0);
        }

        let password_hash = self.credentials.hash_credential(&self.persona_password).await?;
        let mut created = Vec::with_capacity(PERSONAS.len());
        for profile in PERSONAS {
            let user = User {
                id: UserId::new(),
                username: profile.username.to_string(),
                email: profile.email(),
                password_hash: password_hash.clone(),
                name: profile.name.to_string(),
                bio: profile.bio.to_string(),
                avatar: profile.avatar(),
                created_at: Utc::now(),
            };
            self.users.create_user(&user).await?;
            created.push(user.id);
        }

        for (i, a) in created.iter().enumerate() {
            for b in created.iter().skip(i + 1).take(SEED_FRIEND_SPAN) {
                self.friendships.add_friendship(a, b).await?;
            }
        }

        info!(count = created.len(), "Seeded persona accounts");
        Ok(created.len())
    }

    /// Provision a human account.
    ///
    /// The first few existing users (by name) send the new account a
    /// pending friend request.
    pub async fn create_user(&self, request: CreateUserRequest) -> Result<User, AccountError> {
        for (field, value) in [
            ("username", &request.username),
            ("email", &request.email),
            ("name", &request.name),
            ("password", &request.password),
        ] {
            if value.trim().is_empty() {
                return Err(AccountError::InvalidField(format!("{field} is required")));
            }
        }

        let username = request.username.trim();
        let email = request.email.trim();

        let existing = self.users.list_users().await?;
        if existing
            .iter()
            .any(|u| u.username == username || u.email == email)
        {
            return Err(AccountError::Duplicate);
        }

        let user = User {
            id: UserId::new(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: self.credentials.hash_credential(&request.password).await?,
            name: request.name.trim().to_string(),
            bio: request.bio.unwrap_or_default(),
            avatar: request.avatar.unwrap_or_default(),
            created_at: Utc::now(),
        };
        match self.users.create_user(&user).await {
            Ok(()) => {}
            Err(RepositoryError::Conflict(_)) => return Err(AccountError::Duplicate),
            Err(e) => return Err(e.into()),
        }

        for greeter in existing.iter().take(WELCOME_REQUESTS) {
            if let Err(e) = self
                .friendships
                .upsert_request(&FriendRequest::pending(greeter.id, user.id))
                .await
            {
                warn!(greeter = %greeter.id, error = %e, "Failed to create welcome request");
            }
        }

        info!(user_id = %user.id, username = %user.username, "User created");
        Ok(user)
    }

    /// Issue a bearer token for `username`.
    pub async fn issue_session(&self, username: &str) -> Result<IssuedSession, AccountError> {
        let user = self
            .users
            .get_user_by_username(username)
            .await?
            .ok_or(AccountError::NotFound)?;

        let token = generate_token();
        self.sessions
            .create_session(&self.digests.compute_hash(&token), &user.id)
            .await?;

        info!(user_id = %user.id, "Session issued");
        Ok(IssuedSession {
            token,
            user_id: user.id,
            username: user.username,
        })
    }

    /// Resolve a presented bearer token to its user.
    pub async fn resolve_session(&self, token: &str) -> Result<Option<UserId>, AccountError> {
        if !token.starts_with(TOKEN_PREFIX) {
            return Ok(None);
        }
        Ok(self
            .sessions
            .resolve_session(&self.digests.compute_hash(token))
            .await?)
    }

    /// All accounts, ordered by name.
    pub async fn list_users(&self) -> Result<Vec<User>, AccountError> {
        Ok(self.users.list_users().await?)
    }
}

fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    format!("{TOKEN_PREFIX}{hex}")
}
