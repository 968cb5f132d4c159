use async_trait::async_trait;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use super::messages::{
    translate_event, RealtimeEvent, RealtimeOptions, RealtimeRequest, TranscriptEvent,
    SUPPORTED_SAMPLE_RATES,
};
use super::{UpstreamConnection, UpstreamConnector, UpstreamHandle};
use crate::error::RelayError;

/// Timeout for the initial WebSocket handshake.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;
type WsSource = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// WebSocket client for the realtime speech-to-text service.
///
/// Session configuration travels in the connection URL's query string; the
/// API key goes in the `xi-api-key` header. The read half runs as a
/// background task that only decodes and enqueues events, so the socket's
/// I/O loop is never stalled by downstream work.
pub struct ScribeRealtimeClient;

impl ScribeRealtimeClient {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ScribeRealtimeClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UpstreamConnector for ScribeRealtimeClient {
    async fn connect(&self, options: &RealtimeOptions) -> Result<UpstreamConnection, RelayError> {
        if !SUPPORTED_SAMPLE_RATES.contains(&options.sample_rate) {
            return Err(RelayError::UpstreamConnectFailure(format!(
                "unsupported sample rate {} (expected one of {:?})",
                options.sample_rate, SUPPORTED_SAMPLE_RATES
            )));
        }

        let mut request = options
            .endpoint_url()
            .into_client_request()
            .map_err(|e| RelayError::UpstreamConnectFailure(e.to_string()))?;

        request.headers_mut().insert(
            "xi-api-key",
            HeaderValue::from_str(&options.api_key)
                .map_err(|e| RelayError::UpstreamConnectFailure(e.to_string()))?,
        );

        info!("Connecting to recognition service at {}", options.url);

        let (ws_stream, _response) = timeout(CONNECT_TIMEOUT, connect_async(request))
            .await
            .map_err(|_| RelayError::UpstreamConnectFailure("connection timeout".to_string()))?
            .map_err(|e| RelayError::UpstreamConnectFailure(e.to_string()))?;

        let (write, read) = ws_stream.split();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let reader_task = tokio::spawn(read_loop(read, event_tx, options.include_timestamps));

        Ok(UpstreamConnection {
            handle: Box::new(ScribeHandle {
                write,
                reader_task,
            }),
            events: event_rx,
        })
    }
}

/// Drain the socket's read half into the event channel.
///
/// Each wire message is decoded and forwarded synchronously; all real work
/// happens on the channel's consumer side. Socket close or error maps to a
/// final `Closed` event.
async fn read_loop(
    mut read: WsSource,
    event_tx: mpsc::UnboundedSender<TranscriptEvent>,
    include_timestamps: bool,
) {
    while let Some(message) = read.next().await {
        match message {
            Ok(Message::Text(text)) => match serde_json::from_str::<RealtimeEvent>(&text) {
                Ok(event) => {
                    if let Some(event) = translate_event(event, include_timestamps) {
                        if event_tx.send(event).is_err() {
                            debug!("Event consumer gone, stopping upstream reader");
                            return;
                        }
                    }
                }
                Err(e) => warn!("Undecodable recognition event: {}", e),
            },
            Ok(Message::Close(_)) => {
                info!("Recognition service closed the connection");
                break;
            }
            Err(e) => {
                warn!("{}", RelayError::UpstreamDisconnect(e.to_string()));
                break;
            }
            _ => {} // Ignore ping/pong/binary
        }
    }

    let _ = event_tx.send(TranscriptEvent::Closed);
}

struct ScribeHandle {
    write: WsSink,
    reader_task: JoinHandle<()>,
}

impl ScribeHandle {
    async fn send_request(&mut self, request: &RealtimeRequest) -> Result<(), RelayError> {
        let json = serde_json::to_string(request)
            .map_err(|e| RelayError::UpstreamDisconnect(e.to_string()))?;

        self.write
            .send(Message::Text(json))
            .await
            .map_err(|e| RelayError::UpstreamDisconnect(e.to_string()))
    }
}

#[async_trait]
impl UpstreamHandle for ScribeHandle {
    async fn send_audio(&mut self, samples: &[i16]) -> Result<(), RelayError> {
        self.send_request(&RealtimeRequest::input_audio(samples)).await
    }

    async fn commit(&mut self) -> Result<(), RelayError> {
        self.send_request(&RealtimeRequest::Commit).await
    }

    async fn close(&mut self) -> Result<(), RelayError> {
        let result = self
            .write
            .close()
            .await
            .map_err(|e| RelayError::UpstreamDisconnect(e.to_string()));

        self.reader_task.abort();
        result
    }
}

impl Drop for ScribeHandle {
    fn drop(&mut self) {
        self.reader_task.abort();
    }
}
