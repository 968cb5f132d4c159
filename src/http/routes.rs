use super::handlers;
use super::state::AppState;
use super::ws;
use axum::{
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Live transcription control plane
        .route("/ws/transcribe", get(ws::ws_transcribe))
        // Stored meetings
        .route("/api/meetings", get(handlers::list_meetings))
        .route(
            "/api/meetings/:meeting_id",
            get(handlers::get_meeting).delete(handlers::delete_meeting),
        )
        .route(
            "/api/meetings/:meeting_id/audio",
            get(handlers::get_meeting_audio),
        )
        // Browser clients talk to us from another origin
        .layer(CorsLayer::permissive())
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
