//! Notification HTTP handlers.
//!
//! Endpoints:
//! - GET  /api/v1/notifications           - Latest notifications, newest first
//! - POST /api/v1/notifications/{id}/read - Mark one as read

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use tracing::Instrument;

use xssbook_observe::fields::OP_MARK_NOTIFICATION_READ;
use xssbook_types::notification::NotificationView;

use super::parse_uuid;
use crate::http::error::AppError;
use crate::http::extractors::caller::Caller;
use crate::http::response::{ApiResponse, envelope};
use crate::state::AppState;

/// GET /api/v1/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<ApiResponse<Vec<NotificationView>>>, AppError> {
    let start = Instant::now();
    let notifications = state.notification_service.list(caller.0).await?;
    Ok(envelope(notifications, start))
}

/// POST /api/v1/notifications/{id}/read
///
/// Succeeds even when the id belongs to someone else; `updated` tells
/// whether anything changed.
pub async fn mark_notification_read(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let id = parse_uuid(&id)?;
    let updated = state
        .notification_service
        .mark_read(caller.0, &id)
        .instrument(caller.span(OP_MARK_NOTIFICATION_READ))
        .await?;
    Ok(envelope(serde_json::json!({ "updated": updated }), start))
}
