use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::protocol::ControlMessage;
use super::state::AppState;
use crate::error::RelayError;

/// GET /ws/transcribe
/// Upgrade and run one transcription session over the socket.
pub async fn ws_transcribe(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Adapt the socket to the coordinator's channel interface: a reader task
/// decodes inbound frames into control messages, a writer task serializes
/// outbound server events, and the coordinator runs between them.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    let (ctrl_tx, ctrl_rx) = mpsc::channel::<ControlMessage>(64);
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    let writer = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(e) => {
                    warn!("Failed to serialize server event: {}", e);
                    continue;
                }
            };
            if ws_tx.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
        let _ = ws_tx.send(Message::Close(None)).await;
    });

    let reader = tokio::spawn(async move {
        while let Some(received) = ws_rx.next().await {
            let message = match received {
                Ok(message) => message,
                Err(e) => {
                    debug!("{}: {}", RelayError::ProducerDisconnect, e);
                    break;
                }
            };

            match message {
                Message::Text(text) => match serde_json::from_str::<ControlMessage>(&text) {
                    Ok(control) => {
                        if ctrl_tx.send(control).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        // Undecodable messages terminate the exchange; the
                        // coordinator sees the channel close.
                        warn!("Undecodable control message: {}", e);
                        break;
                    }
                },
                Message::Close(_) => break,
                _ => {} // Ignore binary/ping/pong
            }
        }
    });

    match state.coordinator().run(ctrl_rx, event_tx).await {
        Ok(outcome) => info!(
            "Transcription exchange complete: session {} ({} segments)",
            outcome.session_id, outcome.segment_count
        ),
        Err(RelayError::ProducerDisconnect) => {
            debug!("Producer disconnected before starting a session")
        }
        Err(e) => warn!("Transcription exchange failed: {}", e),
    }

    reader.abort();
    let _ = writer.await;
}
