//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use xssbook_types::error::{AccountError, ChatError, FriendError, PostError};

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    Chat(ChatError),
    Friend(FriendError),
    Account(AccountError),
    Post(PostError),
    /// Malformed path or query parameter.
    Validation(String),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl From<FriendError> for AppError {
    fn from(e: FriendError) -> Self {
        AppError::Friend(e)
    }
}

impl From<AccountError> for AppError {
    fn from(e: AccountError) -> Self {
        AppError::Account(e)
    }
}

impl From<PostError> for AppError {
    fn from(e: PostError) -> Self {
        AppError::Post(e)
    }
}

const NOT_LOGGED_IN: &str = "Not logged in";
const INTERNAL: &str = "Internal server error";

impl AppError {
    /// Status, machine code and client-facing message.
    pub fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Chat(e) => match e {
                ChatError::Unauthorized => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", NOT_LOGGED_IN.to_string())
                }
                ChatError::InvalidRequest(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                ChatError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                ChatError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
                ChatError::Storage(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", INTERNAL.to_string())
                }
            },
            AppError::Friend(e) => match e {
                FriendError::Unauthorized => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", NOT_LOGGED_IN.to_string())
                }
                FriendError::InvalidRequest(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                FriendError::SelfRequest => {
                    (StatusCode::BAD_REQUEST, "SELF_REQUEST", e.to_string())
                }
                FriendError::AlreadyFriends => {
                    (StatusCode::BAD_REQUEST, "ALREADY_FRIENDS", e.to_string())
                }
                FriendError::RequestAlreadySent => {
                    (StatusCode::BAD_REQUEST, "REQUEST_ALREADY_SENT", e.to_string())
                }
                FriendError::RequestAlreadyReceived => {
                    (StatusCode::BAD_REQUEST, "REQUEST_ALREADY_RECEIVED", e.to_string())
                }
                FriendError::UserNotFound => {
                    (StatusCode::NOT_FOUND, "USER_NOT_FOUND", e.to_string())
                }
                FriendError::RequestNotFound => {
                    (StatusCode::NOT_FOUND, "REQUEST_NOT_FOUND", e.to_string())
                }
                FriendError::Storage(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", INTERNAL.to_string())
                }
            },
            AppError::Account(e) => match e {
                AccountError::Duplicate => (StatusCode::BAD_REQUEST, "DUPLICATE", e.to_string()),
                AccountError::InvalidField(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                AccountError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND", e.to_string()),
                AccountError::Credential(_) | AccountError::Storage(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "ACCOUNT_ERROR", INTERNAL.to_string())
                }
            },
            AppError::Post(e) => match e {
                PostError::Unauthorized => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", NOT_LOGGED_IN.to_string())
                }
                PostError::InvalidRequest(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                PostError::PostNotFound => (StatusCode::NOT_FOUND, "POST_NOT_FOUND", e.to_string()),
                PostError::UserNotFound => (StatusCode::NOT_FOUND, "USER_NOT_FOUND", e.to_string()),
                PostError::Storage(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", INTERNAL.to_string())
                }
            },
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        if status.is_server_error() {
            tracing::error!(code, error = ?self, "Request failed");
        } else {
            tracing::debug!(code, %status, "Request rejected");
        }

        let body = ApiResponse::error(code, &message, Uuid::now_v7().to_string(), 0);
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xssbook_types::error::RepositoryError;

    fn status_of(err: impl Into<AppError>) -> StatusCode {
        err.into().parts().0
    }

    #[test]
    fn test_chat_error_statuses() {
        assert_eq!(status_of(ChatError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(ChatError::InvalidRequest("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(ChatError::Forbidden("x".into())), StatusCode::FORBIDDEN);
        assert_eq!(status_of(ChatError::NotFound("x".into())), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(ChatError::Storage(RepositoryError::Connection)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_friend_error_statuses() {
        assert_eq!(status_of(FriendError::AlreadyFriends), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(FriendError::RequestAlreadyReceived), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(FriendError::UserNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_of(FriendError::Unauthorized), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_post_error_statuses() {
        assert_eq!(status_of(PostError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(PostError::InvalidRequest("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(PostError::PostNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_of(PostError::UserNotFound), StatusCode::NOT_FOUND);
        let (status, code, message) =
            AppError::from(PostError::Storage(RepositoryError::Query("no such table: likes".into())))
                .parts();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "STORAGE_ERROR");
        assert!(!message.contains("likes"));
    }

    #[test]
    fn test_storage_details_are_not_leaked() {
        let err = AppError::from(ChatError::Storage(RepositoryError::Query(
            "no such table: messages".into(),
        )));
        let (_, code, message) = err.parts();
        assert_eq!(code, "STORAGE_ERROR");
        assert!(!message.contains("messages"));
    }

    #[test]
    fn test_forbidden_keeps_message() {
        let (_, code, message) =
            AppError::from(ChatError::Forbidden("You can only message friends".into())).parts();
        assert_eq!(code, "FORBIDDEN");
        assert_eq!(message, "You can only message friends");
    }
}
