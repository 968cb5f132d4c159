use anyhow::{Context, Result};
use base64::Engine;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::config::SessionConfig;
use super::reconcile::{ReconcileConfig, ReconciliationEngine};
use crate::audio::{AudioChunker, BoundedChunkQueue, StreamAudioSink};
use crate::error::RelayError;
use crate::http::protocol::{ControlMessage, ServerEvent};
use crate::store::{MeetingStore, Segment, SessionMetadata, SessionStatus};
use crate::upstream::{
    RealtimeOptions, TranscriptEvent, UpstreamConnection, UpstreamConnector, UpstreamHandle,
};

/// Result of a finalized session.
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub session_id: String,
    pub duration_secs: u64,
    pub segment_count: usize,
}

/// Owns one transcription session from handshake to finalize.
///
/// Lifecycle: awaiting-start → streaming → stopping → finalized. The
/// coordinator pairs the producer's control channel with the recognition
/// service connection, runs the audio pipeline and the event/reconciliation
/// loop as separate tasks, and executes the finalize routine exactly once
/// on every exit path that created session state.
pub struct SessionCoordinator {
    config: SessionConfig,
    reconcile: ReconcileConfig,
    options: RealtimeOptions,
    store: MeetingStore,
    connector: Arc<dyn UpstreamConnector>,
}

impl SessionCoordinator {
    pub fn new(
        config: SessionConfig,
        reconcile: ReconcileConfig,
        options: RealtimeOptions,
        store: MeetingStore,
        connector: Arc<dyn UpstreamConnector>,
    ) -> Self {
        Self {
            config,
            reconcile,
            options,
            store,
            connector,
        }
    }

    /// Run one session over an established control exchange.
    ///
    /// `ctrl_rx` carries decoded producer messages; `events_tx` carries
    /// events back to the producer. The channel closing is treated as a
    /// producer disconnect (an implicit stop once streaming).
    pub async fn run(
        &self,
        mut ctrl_rx: mpsc::Receiver<ControlMessage>,
        events_tx: mpsc::UnboundedSender<ServerEvent>,
    ) -> Result<SessionOutcome, RelayError> {
        // --- Awaiting start -------------------------------------------------
        let (title, language) = match ctrl_rx.recv().await {
            Some(ControlMessage::Start { title, language }) => (
                title.unwrap_or_else(|| "Untitled Meeting".to_string()),
                language,
            ),
            Some(other) => {
                let _ = events_tx.send(ServerEvent::Error {
                    message: "Expected start message".to_string(),
                });
                return Err(RelayError::MalformedControlMessage(format!(
                    "first message was `{}`",
                    other.kind()
                )));
            }
            None => return Err(RelayError::ProducerDisconnect),
        };

        // Connect upstream before creating any session state, so a refused
        // connection leaves no dangling "recording" session behind.
        let mut options = self.options.clone();
        if language.is_some() {
            options.language_code = language;
        }

        let UpstreamConnection {
            handle,
            events,
        } = match self.connector.connect(&options).await {
            Ok(connection) => connection,
            Err(e) => {
                let _ = events_tx.send(ServerEvent::Error {
                    message: e.to_string(),
                });
                return Err(e);
            }
        };

        // --- Streaming ------------------------------------------------------
        let session_id = allocate_session_id();
        let mut metadata = SessionMetadata {
            title,
            created_at: Utc::now(),
            status: SessionStatus::Recording,
            duration_secs: 0,
            segment_count: 0,
        };

        let sink = match self.prepare_storage(&session_id, &metadata) {
            Ok(sink) => sink,
            Err(e) => {
                let _ = events_tx.send(ServerEvent::Error {
                    message: format!("Failed to prepare session storage: {}", e),
                });
                return Err(RelayError::StorageFailure(e.to_string()));
            }
        };

        info!("Session {} streaming ({:?})", session_id, metadata.title);
        let _ = events_tx.send(ServerEvent::SessionStarted {
            session_id: session_id.clone(),
        });

        let started = Instant::now();
        let queue = Arc::new(BoundedChunkQueue::new(self.config.queue_capacity));
        let mut chunker = AudioChunker::new(self.config.chunk_samples(), sink);

        let stop = CancellationToken::new();
        let drain_cancel = CancellationToken::new();
        let upstream_closed = Arc::new(AtomicBool::new(false));

        let sender_task = tokio::spawn(sender_loop(
            handle,
            Arc::clone(&queue),
            stop.clone(),
            self.config.sender_idle_wait,
        ));

        let mut receiver_task = tokio::spawn(receiver_loop(ReceiverContext {
            events,
            events_tx: events_tx.clone(),
            engine: ReconciliationEngine::new(self.reconcile.clone()),
            stop: stop.clone(),
            drain_cancel: drain_cancel.clone(),
            upstream_closed: Arc::clone(&upstream_closed),
            poll: self.config.event_poll_interval,
        }));

        // Producer phase: relay audio into the pipeline until an explicit
        // stop or a disconnect.
        while let Some(message) = ctrl_rx.recv().await {
            match message {
                ControlMessage::Audio { data } => match decode_pcm_frame(&data) {
                    Ok(samples) if samples.is_empty() => {}
                    Ok(samples) => match chunker.ingest(&samples) {
                        Ok(chunk) => queue.push(chunk),
                        Err(e) => warn!("Failed to ingest audio frame: {}", e),
                    },
                    Err(e) => warn!("Undecodable audio frame: {}", e),
                },
                ControlMessage::Stop => {
                    debug!("Session {} received stop", session_id);
                    break;
                }
                ControlMessage::Start { .. } => {
                    warn!("Ignoring duplicate start for session {}", session_id);
                }
                ControlMessage::Unknown => {}
            }
        }

        // --- Stopping -------------------------------------------------------
        info!("Session {} stopping", session_id);
        stop.cancel();

        // Let the sender drain the queue, then force the service to
        // finalize any in-flight segment and give trailing events a grace
        // period to arrive.
        let mut handle = match sender_task.await {
            Ok(handle) => Some(handle),
            Err(e) => {
                error!("Sender task failed: {}", e);
                None
            }
        };

        if let Some(handle) = handle.as_mut() {
            if !upstream_closed.load(Ordering::SeqCst) {
                if let Err(e) = handle.commit().await {
                    warn!("Final commit failed: {}", e);
                }
                tokio::time::sleep(self.config.final_commit_wait).await;
            }
        }

        // Bounded event drain; past the deadline the drain is cancelled and
        // the session finalizes with the segments collected so far.
        let segments = match timeout(self.config.drain_timeout, &mut receiver_task).await {
            Ok(joined) => joined.unwrap_or_else(|e| {
                error!("Receiver task failed: {}", e);
                Vec::new()
            }),
            Err(_) => {
                warn!("Session {} drain timed out, abandoning remaining events", session_id);
                drain_cancel.cancel();
                receiver_task.await.unwrap_or_else(|e| {
                    error!("Receiver task failed after cancellation: {}", e);
                    Vec::new()
                })
            }
        };

        if let Some(mut handle) = handle {
            if !upstream_closed.load(Ordering::SeqCst) {
                if let Err(e) = handle.close().await {
                    warn!("Failed to close recognition connection: {}", e);
                }
            }
        }

        // --- Finalized ------------------------------------------------------
        // Unconditional: every path through the session (explicit stop,
        // disconnect, drain timeout) arrives here with whatever was
        // collected.
        metadata.status = SessionStatus::Completed;
        metadata.duration_secs = started.elapsed().as_secs();
        metadata.segment_count = segments.len();

        let outcome = self
            .finalize(&session_id, &metadata, &segments, chunker)
            .map_err(|e| RelayError::StorageFailure(e.to_string()))?;

        info!(
            "Session {} finalized: {} segments, {}s",
            outcome.session_id, outcome.segment_count, outcome.duration_secs
        );

        Ok(outcome)
    }

    fn prepare_storage(
        &self,
        session_id: &str,
        metadata: &SessionMetadata,
    ) -> Result<StreamAudioSink> {
        self.store.create_session(session_id)?;

        let prepared = self
            .store
            .write_metadata(session_id, metadata)
            .and_then(|_| {
                StreamAudioSink::create(self.store.audio_path(session_id), self.config.sample_rate)
            });

        if prepared.is_err() {
            self.store.discard_session(session_id);
        }

        prepared
    }

    fn finalize(
        &self,
        session_id: &str,
        metadata: &SessionMetadata,
        segments: &[Segment],
        chunker: AudioChunker,
    ) -> Result<SessionOutcome> {
        if let Err(e) = chunker.finish() {
            warn!("Failed to finalize audio sink for {}: {}", session_id, e);
        }

        // Both writes must land; a failure leaves the on-disk status at
        // `recording`, which marks the session as incomplete.
        self.store
            .write_transcript(session_id, segments)
            .context("transcript write failed during finalize")?;
        self.store
            .write_metadata(session_id, metadata)
            .context("metadata write failed during finalize")?;

        Ok(SessionOutcome {
            session_id: session_id.to_string(),
            duration_secs: metadata.duration_secs,
            segment_count: metadata.segment_count,
        })
    }
}

/// Time-ordered session identifier with a random suffix.
fn allocate_session_id() -> String {
    let stamp = Utc::now().format("%Y%m%d_%H%M%S");
    let uuid = Uuid::new_v4().simple().to_string();
    format!("{}_{}", stamp, &uuid[..6])
}

/// Decode one base64 frame of little-endian 16-bit PCM.
fn decode_pcm_frame(data: &str) -> Result<Vec<i16>> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(data)
        .context("invalid base64 audio payload")?;

    Ok(bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect())
}

/// Forward queued chunks to the recognition service until stopped and
/// drained. Returns the handle so the stop path can commit and close.
async fn sender_loop(
    mut handle: Box<dyn UpstreamHandle>,
    queue: Arc<BoundedChunkQueue>,
    stop: CancellationToken,
    idle_wait: std::time::Duration,
) -> Box<dyn UpstreamHandle> {
    while !stop.is_cancelled() || !queue.is_empty() {
        match queue.pop() {
            Some(chunk) => {
                if let Err(e) = handle.send_audio(&chunk.samples).await {
                    warn!("Audio send failed, abandoning relay: {}", e);
                    break;
                }
            }
            None => tokio::time::sleep(idle_wait).await,
        }
    }

    handle
}

struct ReceiverContext {
    events: mpsc::UnboundedReceiver<TranscriptEvent>,
    events_tx: mpsc::UnboundedSender<ServerEvent>,
    engine: ReconciliationEngine,
    stop: CancellationToken,
    drain_cancel: CancellationToken,
    upstream_closed: Arc<AtomicBool>,
    poll: std::time::Duration,
}

/// Consume recognition events sequentially: relay partials (suppressing
/// repeats), reconcile committed fragments into segments, surface service
/// errors. Exits once stopped and the event queue has gone quiet, or
/// immediately on drain cancellation.
async fn receiver_loop(mut ctx: ReceiverContext) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut last_partial = String::new();

    loop {
        let received = tokio::select! {
            _ = ctx.drain_cancel.cancelled() => break,
            received = timeout(ctx.poll, ctx.events.recv()) => received,
        };

        match received {
            Err(_) => {
                // Queue momentarily empty; once stopped that means drained.
                if ctx.stop.is_cancelled() {
                    break;
                }
            }
            Ok(None) => break,
            Ok(Some(TranscriptEvent::SessionStarted)) => {
                debug!("Recognition session acknowledged");
            }
            Ok(Some(TranscriptEvent::Partial { text })) => {
                let text = text.trim();
                if !text.is_empty() && text != last_partial {
                    last_partial = text.to_string();
                    let _ = ctx.events_tx.send(ServerEvent::Partial {
                        text: last_partial.clone(),
                    });
                }
            }
            Ok(Some(TranscriptEvent::Committed { text })) => {
                if let Some(delta) = ctx.engine.reconcile(&text, Instant::now()) {
                    segments.push(Segment {
                        text: delta.clone(),
                        timestamp: Utc::now(),
                    });
                    let _ = ctx.events_tx.send(ServerEvent::Committed { text: delta });
                }
            }
            Ok(Some(TranscriptEvent::Error { message })) => {
                warn!("{}", RelayError::UpstreamServiceError(message.clone()));
                let _ = ctx.events_tx.send(ServerEvent::Error { message });
            }
            Ok(Some(TranscriptEvent::Closed)) => {
                ctx.upstream_closed.store(true, Ordering::SeqCst);
                break;
            }
        }
    }

    segments
}
