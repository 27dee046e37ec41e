//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`. Middleware: CORS, request tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Messaging
        .route("/messages", post(handlers::message::send_message))
        .route("/conversations", get(handlers::message::list_conversations))
        .route(
            "/conversations/start",
            post(handlers::message::start_conversation),
        )
        .route(
            "/conversations/{user_id}/messages",
            get(handlers::message::get_messages),
        )
        // Profiles
        .route("/users/{id}", get(handlers::user::get_user))
        .route("/users/{id}/posts", get(handlers::post::user_posts))
        // Posts
        .route(
            "/posts",
            get(handlers::post::feed).post(handlers::post::create_post),
        )
        .route("/posts/search", get(handlers::post::search_posts))
        .route(
            "/posts/{id}/comments",
            get(handlers::post::get_comments).post(handlers::post::add_comment),
        )
        .route("/posts/{id}/like", post(handlers::post::like_post))
        // Friendship
        .route(
            "/friends/requests",
            get(handlers::friend::pending_requests).post(handlers::friend::send_request),
        )
        .route(
            "/friends/requests/respond",
            post(handlers::friend::respond_request),
        )
        .route(
            "/friends/requests/generate",
            post(handlers::friend::generate_requests),
        )
        .route("/friends", get(handlers::friend::list_friends))
        .route("/friends/search", get(handlers::friend::search_friends))
        .route("/friends/suggestions", get(handlers::friend::suggestions))
        // Notifications
        .route(
            "/notifications",
            get(handlers::notification::list_notifications),
        )
        .route(
            "/notifications/{id}/read",
            post(handlers::notification::mark_notification_read),
        );

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Liveness check, no session required.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check_reports_version() {
        let axum::Json(body) = health_check().await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_router_builds_with_state() {
        let (state, _dir) = crate::state::test_support::test_state().await;
        let _router = build_router(state);
    }
}
