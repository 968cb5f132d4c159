use serde::{Deserialize, Serialize};

/// Control-plane messages from the producer (browser) to the coordinator.
///
/// The first message of an exchange must be `start`; unknown message types
/// after that are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlMessage {
    Start {
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        language: Option<String>,
    },
    Audio {
        /// Base64-encoded little-endian 16-bit PCM frame.
        data: String,
    },
    Stop,
    #[serde(other)]
    Unknown,
}

impl ControlMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            ControlMessage::Start { .. } => "start",
            ControlMessage::Audio { .. } => "audio",
            ControlMessage::Stop => "stop",
            ControlMessage::Unknown => "unknown",
        }
    }
}

/// Events from the coordinator back to the producer.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    SessionStarted {
        session_id: String,
    },
    /// Provisional text for the current utterance; supersedes the previous
    /// partial, never persisted.
    Partial {
        text: String,
    },
    /// A new deduplicated transcript segment.
    Committed {
        text: String,
    },
    Error {
        message: String,
    },
}
