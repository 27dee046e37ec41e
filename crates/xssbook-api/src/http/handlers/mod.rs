//! HTTP request handlers for the REST API.

pub mod friend;
pub mod message;
pub mod notification;
pub mod post;
pub mod user;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use uuid::Uuid;
use xssbook_types::user::UserId;

use crate::http::error::AppError;

/// Parse a user id from a path parameter, returning a 400 on invalid format.
pub(crate) fn parse_user_id(s: &str) -> Result<UserId, AppError> {
    s.parse::<UserId>()
        .map_err(|_| AppError::Validation(format!("Invalid user ID: {s}")))
}

pub(crate) fn parse_uuid(s: &str) -> Result<Uuid, AppError> {
    s.parse::<Uuid>()
        .map_err(|_| AppError::Validation(format!("Invalid UUID: {s}")))
}

/// An unreadable body is treated as an empty one, so the service reports
/// the missing fields itself.
pub(crate) fn body_or_default<T: Default>(body: Result<Json<T>, JsonRejection>) -> T {
    match body {
        Ok(Json(value)) => value,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unreadable request body, treating as empty");
            T::default()
        }
    }
}
