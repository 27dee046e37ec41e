//! Application state wiring all services together.
//!
//! Services in xssbook-core are generic over repository and hasher traits;
//! AppState pins them to the SQLite and RustCrypto implementations from
//! xssbook-infra. Both the CLI and the REST handlers go through it.

use std::path::PathBuf;
use std::sync::Arc;

use xssbook_core::chat::ConversationCoordinator;
use xssbook_core::responder::ResponseEngine;
use xssbook_core::service::account::AccountService;
use xssbook_core::service::friendship::FriendshipService;
use xssbook_core::service::notification::NotificationService;
use xssbook_core::service::persona::PersonaDetector;
use xssbook_core::service::post::PostService;
use xssbook_infra::config::{load_config, resolve_data_dir};
use xssbook_infra::crypto::credential::Argon2CredentialHasher;
use xssbook_infra::crypto::hash::Sha256ContentHasher;
use xssbook_infra::sqlite::friendship::SqliteFriendshipRepository;
use xssbook_infra::sqlite::message::SqliteMessageRepository;
use xssbook_infra::sqlite::notification::SqliteNotificationRepository;
use xssbook_infra::sqlite::pool::{DatabasePool, database_url};
use xssbook_infra::sqlite::post::SqlitePostRepository;
use xssbook_infra::sqlite::session::SqliteSessionRepository;
use xssbook_infra::sqlite::user::SqliteUserRepository;
use xssbook_types::config::AppConfig;

pub type ConcreteCoordinator = ConversationCoordinator<
    SqliteUserRepository,
    SqliteFriendshipRepository,
    SqliteMessageRepository,
    Arc<ResponseEngine>,
    Argon2CredentialHasher,
>;

pub type ConcreteFriendshipService =
    FriendshipService<SqliteUserRepository, SqliteFriendshipRepository, Argon2CredentialHasher>;

pub type ConcreteNotificationService = NotificationService<SqliteNotificationRepository>;

pub type ConcretePostService = PostService<SqliteUserRepository, SqlitePostRepository>;

pub type ConcreteAccountService = AccountService<
    SqliteUserRepository,
    SqliteFriendshipRepository,
    SqliteSessionRepository,
    Argon2CredentialHasher,
    Sha256ContentHasher,
>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<ConcreteCoordinator>,
    pub friendship_service: Arc<ConcreteFriendshipService>,
    pub notification_service: Arc<ConcreteNotificationService>,
    pub account_service: Arc<ConcreteAccountService>,
    pub post_service: Arc<ConcretePostService>,
    pub personas: Arc<PersonaDetector<Argon2CredentialHasher>>,
    pub config: AppConfig,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize against the resolved data directory.
    pub async fn init() -> anyhow::Result<Self> {
        Self::init_at(resolve_data_dir()).await
    }

    /// Connect to `{data_dir}/xssbook.db`, run migrations, wire services.
    pub async fn init_at(data_dir: PathBuf) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_config(&data_dir).await;
        let db_pool = DatabasePool::new(&database_url(&data_dir)).await?;

        let users = SqliteUserRepository::new(db_pool.clone());
        let friendships = SqliteFriendshipRepository::new(db_pool.clone());
        let messages = SqliteMessageRepository::new(db_pool.clone());
        let notifications = SqliteNotificationRepository::new(db_pool.clone());
        let sessions = SqliteSessionRepository::new(db_pool.clone());
        let posts = SqlitePostRepository::new(db_pool.clone());

        let engine = Arc::new(ResponseEngine::from_config(&config.responder));
        let personas = || {
            PersonaDetector::new(Argon2CredentialHasher::new(), config.persona_password.clone())
        };

        let coordinator = ConversationCoordinator::new(
            users.clone(),
            friendships.clone(),
            messages,
            engine,
            personas(),
        );

        let friendship_service = FriendshipService::new(
            users.clone(),
            friendships.clone(),
            personas(),
            config.max_generated_requests,
        );

        let post_service = PostService::new(users.clone(), posts, &config.posts);

        let account_service = AccountService::new(
            users,
            friendships,
            sessions,
            Argon2CredentialHasher::new(),
            Sha256ContentHasher::new(),
            config.persona_password.clone(),
        );

        tracing::debug!(data_dir = %data_dir.display(), "Application state initialized");

        Ok(Self {
            coordinator: Arc::new(coordinator),
            friendship_service: Arc::new(friendship_service),
            notification_service: Arc::new(NotificationService::new(notifications)),
            account_service: Arc::new(account_service),
            post_service: Arc::new(post_service),
            personas: Arc::new(personas()),
            config,
            data_dir,
        })
    }
}
