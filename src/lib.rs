pub mod audio;
pub mod config;
pub mod error;
pub mod http;
pub mod session;
pub mod store;
pub mod upstream;

pub use audio::{AudioChunk, AudioChunker, BoundedChunkQueue, StreamAudioSink};
pub use config::Config;
pub use error::RelayError;
pub use http::{create_router, AppState, ControlMessage, ServerEvent};
pub use session::{
    ReconcileConfig, ReconciliationEngine, SessionConfig, SessionCoordinator, SessionOutcome,
};
pub use store::{MeetingStore, MeetingSummary, Segment, SessionMetadata, SessionStatus};
pub use upstream::{
    CommitStrategy, RealtimeOptions, ScribeRealtimeClient, TranscriptEvent, UpstreamConnection,
    UpstreamConnector, UpstreamHandle, VadOptions,
};
