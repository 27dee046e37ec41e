//! Direct message HTTP handlers.
//!
//! Endpoints:
//! - POST /api/v1/messages                          - Send a message to a friend
//! - POST /api/v1/conversations/start               - Let a persona speak first
//! - GET  /api/v1/conversations                     - One summary per counterpart
//! - GET  /api/v1/conversations/{user_id}/messages  - Messages with one friend

use std::time::Instant;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use tracing::Instrument;

use xssbook_observe::fields::{
    OP_GET_MESSAGES, OP_LIST_CONVERSATIONS, OP_SEND_MESSAGE, OP_START_CONVERSATION,
};
use xssbook_types::message::{
    ConversationSummary, MessageView, SendMessageRequest, SendReceipt, StartConversationRequest,
};

use super::{body_or_default, parse_user_id};
use crate::http::error::AppError;
use crate::http::extractors::caller::Caller;
use crate::http::response::{ApiResponse, envelope};
use crate::state::AppState;

/// POST /api/v1/messages - Send a message; personas answer in the same call.
pub async fn send_message(
    State(state): State<AppState>,
    caller: Caller,
    body: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<SendReceipt>>, AppError> {
    let start = Instant::now();
    let receipt = state
        .coordinator
        .send_message(caller.0, body_or_default(body))
        .instrument(caller.span(OP_SEND_MESSAGE))
        .await?;
    Ok(envelope(receipt, start))
}

/// POST /api/v1/conversations/start - Persona opener for an empty conversation.
pub async fn start_conversation(
    State(state): State<AppState>,
    caller: Caller,
    body: Result<Json<StartConversationRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let outcome = state
        .coordinator
        .start_conversation(caller.0, body_or_default(body))
        .instrument(caller.span(OP_START_CONVERSATION))
        .await?;
    Ok(envelope(serde_json::json!({ "outcome": outcome }), start))
}

/// GET /api/v1/conversations - Conversation list, newest first.
pub async fn list_conversations(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<ApiResponse<Vec<ConversationSummary>>>, AppError> {
    let start = Instant::now();
    let conversations = state
        .coordinator
        .list_conversations(caller.0)
        .instrument(caller.span(OP_LIST_CONVERSATIONS))
        .await?;
    Ok(envelope(conversations, start))
}

/// GET /api/v1/conversations/{user_id}/messages - Messages with a friend,
/// oldest first. Marks the friend's messages as read.
pub async fn get_messages(
    State(state): State<AppState>,
    caller: Caller,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<MessageView>>>, AppError> {
    let start = Instant::now();
    let other = parse_user_id(&user_id)?;
    let messages = state
        .coordinator
        .get_messages(caller.0, &other)
        .instrument(caller.span(OP_GET_MESSAGES))
        .await?;
    Ok(envelope(messages, start))
}
