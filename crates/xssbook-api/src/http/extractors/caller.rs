//! Bearer session extractor.
//!
//! Resolves `Authorization: Bearer <token>` to the calling user. A missing,
//! malformed or unknown token yields an anonymous caller rather than a
//! rejection: the services decide whether an operation needs a user.

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::Span;

use xssbook_observe::fields::{CALLER_ID, OPERATION};
use xssbook_types::user::UserId;

use crate::http::error::AppError;
use crate::state::AppState;

/// The user making the request, if any.
#[derive(Debug, Clone, Copy)]
pub struct Caller(pub Option<UserId>);

impl Caller {
    /// Span for a service call made on behalf of this caller.
    pub fn span(&self, operation: &'static str) -> Span {
        let caller = self
            .0
            .map(|id| id.to_string())
            .unwrap_or_else(|| "anonymous".to_string());
        tracing::info_span!("xssbook", { OPERATION } = operation, { CALLER_ID } = %caller)
    }
}

impl FromRequestParts<AppState> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(&parts.headers) else {
            return Ok(Caller(None));
        };

        let user = state.account_service.resolve_session(token).await?;
        if user.is_none() {
            tracing::debug!("Unknown session token presented");
        }
        Ok(Caller(user))
    }
}

/// Token from an `Authorization: Bearer` header, if well-formed.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}
