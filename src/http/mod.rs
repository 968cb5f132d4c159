//! HTTP API and WebSocket control plane:
//! - GET /ws/transcribe - live transcription exchange
//! - GET /api/meetings - list stored sessions
//! - GET /api/meetings/:id - metadata + transcript
//! - DELETE /api/meetings/:id - remove a session
//! - GET /api/meetings/:id/audio - captured audio (WAV)
//! - GET /health - health check

mod handlers;
pub mod protocol;
mod routes;
mod state;
mod ws;

pub use protocol::{ControlMessage, ServerEvent};
pub use routes::create_router;
pub use state::AppState;
