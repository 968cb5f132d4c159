use thiserror::Error;

/// Failure taxonomy for the transcription relay.
///
/// Queue overflow is deliberately absent: dropping the oldest chunk is a
/// flow-control decision, not a failure.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The producer's first message was not `start`, or a message could
    /// not be decoded. No session state is created.
    #[error("malformed control message: {0}")]
    MalformedControlMessage(String),

    /// The streaming connection to the recognition service could not be
    /// established. The session is never marked as recording.
    #[error("recognition service connection failed: {0}")]
    UpstreamConnectFailure(String),

    /// The producer side went away. Treated as an implicit stop when a
    /// session is active.
    #[error("producer disconnected")]
    ProducerDisconnect,

    /// The recognition service connection dropped mid-session.
    #[error("recognition service disconnected: {0}")]
    UpstreamDisconnect(String),

    /// An error event emitted by the recognition service. Relayed to the
    /// producer; does not by itself terminate the session.
    #[error("recognition service error: {0}")]
    UpstreamServiceError(String),

    /// A metadata or transcript write failed. The session is left in a
    /// detectably incomplete state (status still `recording`).
    #[error("storage failure: {0}")]
    StorageFailure(String),
}
