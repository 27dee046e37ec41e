//! Friendship HTTP handlers.
//!
//! Endpoints:
//! - POST /api/v1/friends/requests          - Send a friend request
//! - POST /api/v1/friends/requests/respond  - Accept or decline a request
//! - GET  /api/v1/friends/requests          - Pending requests addressed to me
//! - POST /api/v1/friends/requests/generate - Have random personas add me
//! - GET  /api/v1/friends                   - My friends
//! - GET  /api/v1/friends/search?q=         - Search my friends
//! - GET  /api/v1/friends/suggestions       - People I might know

use std::time::Instant;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::Instrument;

use xssbook_observe::fields::{
    OP_GENERATE_REQUESTS, OP_RESPOND_FRIEND_REQUEST, OP_SEND_FRIEND_REQUEST,
};
use xssbook_types::friendship::{IncomingRequest, RespondFriendRequest, SendFriendRequest};
use xssbook_types::user::UserSummary;

use super::body_or_default;
use crate::http::error::AppError;
use crate::http::extractors::caller::Caller;
use crate::http::response::{ApiResponse, envelope};
use crate::state::AppState;

/// Query parameters for friend search.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// POST /api/v1/friends/requests
pub async fn send_request(
    State(state): State<AppState>,
    caller: Caller,
    body: Result<Json<SendFriendRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let outcome = state
        .friendship_service
        .send_request(caller.0, body_or_default(body))
        .instrument(caller.span(OP_SEND_FRIEND_REQUEST))
        .await?;
    Ok(envelope(serde_json::json!({ "outcome": outcome }), start))
}

/// POST /api/v1/friends/requests/respond
pub async fn respond_request(
    State(state): State<AppState>,
    caller: Caller,
    body: Result<Json<RespondFriendRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let action = state
        .friendship_service
        .respond(caller.0, body_or_default(body))
        .instrument(caller.span(OP_RESPOND_FRIEND_REQUEST))
        .await?;
    Ok(envelope(serde_json::json!({ "action": action }), start))
}

/// GET /api/v1/friends/requests
pub async fn pending_requests(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<ApiResponse<Vec<IncomingRequest>>>, AppError> {
    let start = Instant::now();
    let requests = state.friendship_service.pending_requests(caller.0).await?;
    Ok(envelope(requests, start))
}

/// POST /api/v1/friends/requests/generate
pub async fn generate_requests(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let created = state
        .friendship_service
        .generate_persona_requests(caller.0)
        .instrument(caller.span(OP_GENERATE_REQUESTS))
        .await?;
    Ok(envelope(serde_json::json!({ "created": created }), start))
}

/// GET /api/v1/friends
pub async fn list_friends(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<ApiResponse<Vec<UserSummary>>>, AppError> {
    let start = Instant::now();
    let friends = state.friendship_service.friends(caller.0).await?;
    Ok(envelope(friends, start))
}

/// GET /api/v1/friends/search?q=
pub async fn search_friends(
    State(state): State<AppState>,
    caller: Caller,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<UserSummary>>>, AppError> {
    let start = Instant::now();
    let friends = state
        .friendship_service
        .search_friends(caller.0, &query.q)
        .await?;
    Ok(envelope(friends, start))
}

/// GET /api/v1/friends/suggestions
pub async fn suggestions(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<ApiResponse<Vec<UserSummary>>>, AppError> {
    let start = Instant::now();
    let users = state.friendship_service.suggestions(caller.0).await?;
    Ok(envelope(users, start))
}
