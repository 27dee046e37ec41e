use thiserror::Error;

/// Errors from repository operations (used by trait definitions in xssbook-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors surfaced by the conversation coordinator.
///
/// Every variant is recoverable and maps to a distinct HTTP status.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("not logged in")]
    Unauthorized,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

/// Errors from friend-request flows.
#[derive(Debug, Error)]
pub enum FriendError {
    #[error("not logged in")]
    Unauthorized,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("cannot send friend request to yourself")]
    SelfRequest,

    #[error("already friends")]
    AlreadyFriends,

    #[error("friend request already sent")]
    RequestAlreadySent,

    #[error("this user has already sent you a friend request")]
    RequestAlreadyReceived,

    #[error("user not found")]
    UserNotFound,

    #[error("friend request not found")]
    RequestNotFound,

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

/// Failure to synthesize a persona reply.
///
/// Never shown to end users: the coordinator substitutes a fixed reply.
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("random source unavailable")]
    RngUnavailable,

    #[error("no candidate replies for category '{0}'")]
    EmptyCandidates(String),

    #[error("responder failure: {0}")]
    Other(String),
}

/// Errors from posts, comments and likes.
#[derive(Debug, Error)]
pub enum PostError {
    #[error("not logged in")]
    Unauthorized,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("post not found")]
    PostNotFound,

    #[error("user not found")]
    UserNotFound,

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

/// Errors from account provisioning and session issuing.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("username or email already exists")]
    Duplicate,

    #[error("invalid account field: {0}")]
    InvalidField(String),

    #[error("user not found")]
    NotFound,

    #[error("credential error: {0}")]
    Credential(String),

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}
