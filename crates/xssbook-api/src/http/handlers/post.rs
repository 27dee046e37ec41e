//! Post, comment and like HTTP handlers.
//!
//! Endpoints:
//! - GET  /api/v1/posts                 - Feed, newest first
//! - POST /api/v1/posts                 - Publish a post
//! - GET  /api/v1/posts/search?q=       - Posts by content or author name
//! - GET  /api/v1/posts/{id}/comments   - Comments, oldest first
//! - POST /api/v1/posts/{id}/comments   - Comment on a post
//! - POST /api/v1/posts/{id}/like       - Toggle my like
//! - GET  /api/v1/users/{id}/posts      - A user's wall
//!
//! Content is returned exactly as stored, without output encoding.

use std::time::Instant;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use tracing::Instrument;

use xssbook_observe::fields::{OP_ADD_COMMENT, OP_CREATE_POST, OP_LIKE_POST};
use xssbook_types::post::{AddCommentRequest, CommentView, CreatePostRequest, LikeOutcome, PostView};

use super::{body_or_default, parse_user_id, parse_uuid};
use crate::http::error::AppError;
use crate::http::extractors::caller::Caller;
use crate::http::response::{ApiResponse, envelope};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PostSearchQuery {
    #[serde(default)]
    pub q: String,
}

/// GET /api/v1/posts
pub async fn feed(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<PostView>>>, AppError> {
    let start = Instant::now();
    let posts = state.post_service.feed().await?;
    Ok(envelope(posts, start))
}

/// POST /api/v1/posts
pub async fn create_post(
    State(state): State<AppState>,
    caller: Caller,
    body: Result<Json<CreatePostRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<PostView>>, AppError> {
    let start = Instant::now();
    let post = state
        .post_service
        .create_post(caller.0, body_or_default(body))
        .instrument(caller.span(OP_CREATE_POST))
        .await?;
    Ok(envelope(post, start))
}

/// GET /api/v1/posts/search?q=
pub async fn search_posts(
    State(state): State<AppState>,
    Query(query): Query<PostSearchQuery>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let results = state.post_service.search(&query.q).await?;
    // The query is echoed back verbatim alongside the results.
    Ok(envelope(
        serde_json::json!({ "query": query.q, "results": results }),
        start,
    ))
}

/// GET /api/v1/posts/{id}/comments
pub async fn get_comments(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<CommentView>>>, AppError> {
    let start = Instant::now();
    let id = parse_uuid(&id)?;
    let comments = state.post_service.comments(&id).await?;
    Ok(envelope(comments, start))
}

/// POST /api/v1/posts/{id}/comments
pub async fn add_comment(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    body: Result<Json<AddCommentRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<CommentView>>, AppError> {
    let start = Instant::now();
    let id = parse_uuid(&id)?;
    let comment = state
        .post_service
        .add_comment(caller.0, &id, body_or_default(body))
        .instrument(caller.span(OP_ADD_COMMENT))
        .await?;
    Ok(envelope(comment, start))
}

/// POST /api/v1/posts/{id}/like
pub async fn like_post(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<LikeOutcome>>, AppError> {
    let start = Instant::now();
    let id = parse_uuid(&id)?;
    let outcome = state
        .post_service
        .toggle_like(caller.0, &id)
        .instrument(caller.span(OP_LIKE_POST))
        .await?;
    Ok(envelope(outcome, start))
}

/// GET /api/v1/users/{id}/posts
pub async fn user_posts(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<PostView>>>, AppError> {
    let start = Instant::now();
    let id = parse_user_id(&id)?;
    let posts = state.post_service.user_posts(&id).await?;
    Ok(envelope(posts, start))
}
