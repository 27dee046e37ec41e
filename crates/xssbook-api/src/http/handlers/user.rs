//! User profile handler.
//!
//! Endpoints:
//! - GET /api/v1/users/{id} - Public profile summary

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};

use xssbook_types::user::UserSummary;

use super::parse_user_id;
use crate::http::error::AppError;
use crate::http::extractors::caller::Caller;
use crate::http::response::{ApiResponse, envelope};
use crate::state::AppState;

/// GET /api/v1/users/{id} - Profile summary of any user.
pub async fn get_user(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<UserSummary>>, AppError> {
    let start = Instant::now();
    let id = parse_user_id(&id)?;
    let user = state.coordinator.user_info(caller.0, &id).await?;
    Ok(envelope(user, start))
}
