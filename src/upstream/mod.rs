//! Streaming connection to the speech-recognition service.
//!
//! The coordinator talks to the service through the `UpstreamConnector` /
//! `UpstreamHandle` seam so tests can script the event stream; the real
//! implementation is `ScribeRealtimeClient`, a WebSocket client.

pub mod client;
pub mod messages;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::RelayError;
pub use client::ScribeRealtimeClient;
pub use messages::{
    CommitStrategy, RealtimeEvent, RealtimeOptions, RealtimeRequest, TranscriptEvent, VadOptions,
    WordTiming,
};

/// An established recognition-service connection: the send half plus the
/// channel on which decoded transcript events arrive.
pub struct UpstreamConnection {
    pub handle: Box<dyn UpstreamHandle>,
    pub events: mpsc::UnboundedReceiver<TranscriptEvent>,
}

/// Establishes streaming connections to the recognition service.
#[async_trait]
pub trait UpstreamConnector: Send + Sync {
    async fn connect(&self, options: &RealtimeOptions) -> Result<UpstreamConnection, RelayError>;
}

/// The send half of an active recognition-service connection.
#[async_trait]
pub trait UpstreamHandle: Send {
    /// Forward one chunk of PCM samples.
    async fn send_audio(&mut self, samples: &[i16]) -> Result<(), RelayError>;

    /// Force the service to finalize any in-flight recognition segment.
    async fn commit(&mut self) -> Result<(), RelayError>;

    /// Close the connection.
    async fn close(&mut self) -> Result<(), RelayError>;
}
