use std::time::Duration;

/// Per-session pipeline settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// PCM sample rate for the whole pipeline.
    pub sample_rate: u32,

    /// Duration of one audio chunk.
    pub chunk_ms: u32,

    /// Capacity of the bounded chunk queue between ingest and send.
    pub queue_capacity: usize,

    /// Wait after the final commit so trailing recognition events arrive.
    pub final_commit_wait: Duration,

    /// Bound on draining queued events after stop; past it the drain is
    /// cancelled and the session finalizes with what it has.
    pub drain_timeout: Duration,

    /// Receive timeout in the event loop, so stop requests are noticed.
    pub event_poll_interval: Duration,

    /// Sender backoff when the chunk queue is momentarily empty.
    pub sender_idle_wait: Duration,
}

impl SessionConfig {
    pub fn chunk_samples(&self) -> usize {
        (self.sample_rate as u64 * self.chunk_ms as u64 / 1000) as usize
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            chunk_ms: 60,
            queue_capacity: 200,
            final_commit_wait: Duration::from_millis(800),
            drain_timeout: Duration::from_secs(3),
            event_poll_interval: Duration::from_millis(100),
            sender_idle_wait: Duration::from_millis(2),
        }
    }
}
