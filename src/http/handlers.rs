use super::state::AppState;
use crate::store::{Segment, SessionMetadata};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use serde::Serialize;
use tracing::error;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct MeetingDetail {
    pub id: String,
    pub metadata: SessionMetadata,
    pub transcript: Vec<Segment>,
}

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// GET /api/meetings
/// All stored sessions, newest first.
pub async fn list_meetings(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.list() {
        Ok(meetings) => (StatusCode::OK, Json(meetings)).into_response(),
        Err(e) => {
            error!("Failed to list meetings: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to list meetings: {}", e),
                }),
            )
                .into_response()
        }
    }
}

/// GET /api/meetings/:meeting_id
/// Metadata plus the full transcript for one session.
pub async fn get_meeting(
    State(state): State<AppState>,
    Path(meeting_id): Path<String>,
) -> impl IntoResponse {
    if !state.store.exists(&meeting_id) {
        return meeting_not_found(&meeting_id);
    }

    let metadata = match state.store.load_metadata(&meeting_id) {
        Ok(metadata) => metadata,
        Err(e) => {
            error!("Failed to load meeting {}: {}", meeting_id, e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to load meeting: {}", e),
                }),
            )
                .into_response();
        }
    };

    let transcript = state.store.load_transcript(&meeting_id).unwrap_or_default();

    (
        StatusCode::OK,
        Json(MeetingDetail {
            id: meeting_id,
            metadata,
            transcript,
        }),
    )
        .into_response()
}

/// DELETE /api/meetings/:meeting_id
pub async fn delete_meeting(
    State(state): State<AppState>,
    Path(meeting_id): Path<String>,
) -> impl IntoResponse {
    match state.store.delete(&meeting_id) {
        Ok(true) => (StatusCode::OK, Json(serde_json::json!({ "ok": true }))).into_response(),
        Ok(false) => meeting_not_found(&meeting_id),
        Err(e) => {
            error!("Failed to delete meeting {}: {}", meeting_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to delete meeting: {}", e),
                }),
            )
                .into_response()
        }
    }
}

/// GET /api/meetings/:meeting_id/audio
/// The captured session audio as a WAV download.
pub async fn get_meeting_audio(
    State(state): State<AppState>,
    Path(meeting_id): Path<String>,
) -> impl IntoResponse {
    let path = state.store.audio_path(&meeting_id);

    match tokio::fs::read(&path).await {
        Ok(bytes) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "audio/wav")],
            bytes,
        )
            .into_response(),
        Err(_) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Audio not found".to_string(),
            }),
        )
            .into_response(),
    }
}

fn meeting_not_found(meeting_id: &str) -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("Meeting {} not found", meeting_id),
        }),
    )
        .into_response()
}
