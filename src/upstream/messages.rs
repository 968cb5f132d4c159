use serde::{Deserialize, Serialize};

/// Sample rates the recognition service accepts as raw PCM.
pub const SUPPORTED_SAMPLE_RATES: [u32; 6] = [8000, 16000, 22050, 24000, 44100, 48000];

/// Policy governing when the recognition service finalizes a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitStrategy {
    /// The service commits on detected end of speech.
    Vad,
    /// Segments are committed only on an explicit commit request.
    Manual,
}

impl CommitStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommitStrategy::Vad => "vad",
            CommitStrategy::Manual => "manual",
        }
    }
}

/// Voice-activity-detection tuning forwarded to the service.
#[derive(Debug, Clone)]
pub struct VadOptions {
    pub silence_threshold_secs: f32,
    pub threshold: f32,
    pub min_speech_duration_ms: u32,
    pub min_silence_duration_ms: u32,
}

impl Default for VadOptions {
    fn default() -> Self {
        Self {
            silence_threshold_secs: 0.45,
            threshold: 0.25,
            min_speech_duration_ms: 50,
            min_silence_duration_ms: 50,
        }
    }
}

/// Connection options for one recognition-service session.
#[derive(Debug, Clone)]
pub struct RealtimeOptions {
    pub url: String,
    pub api_key: String,
    pub model_id: String,
    pub sample_rate: u32,
    pub commit_strategy: CommitStrategy,
    pub language_code: Option<String>,
    /// Select the timestamped committed-transcript event variant. Only one
    /// of the two variants is ever consumed.
    pub include_timestamps: bool,
    pub vad: VadOptions,
}

impl RealtimeOptions {
    pub fn audio_format(&self) -> String {
        format!("pcm_{}", self.sample_rate)
    }

    /// Full connection URL with the session configuration as query string.
    pub fn endpoint_url(&self) -> String {
        let mut url = format!(
            "{}?model_id={}&audio_format={}&sample_rate={}&commit_strategy={}&include_timestamps={}",
            self.url,
            self.model_id,
            self.audio_format(),
            self.sample_rate,
            self.commit_strategy.as_str(),
            self.include_timestamps,
        );

        if let Some(language) = &self.language_code {
            url.push_str(&format!("&language_code={}", language));
        }

        if self.commit_strategy == CommitStrategy::Vad {
            url.push_str(&format!(
                "&vad_silence_threshold_secs={}&vad_threshold={}&min_speech_duration_ms={}&min_silence_duration_ms={}",
                self.vad.silence_threshold_secs,
                self.vad.threshold,
                self.vad.min_speech_duration_ms,
                self.vad.min_silence_duration_ms,
            ));
        }

        url
    }
}

// ============================================================================
// Wire messages
// ============================================================================

/// Messages sent to the recognition service.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RealtimeRequest {
    /// One chunk of base64-encoded little-endian PCM.
    InputAudio { audio_base_64: String },
    /// Finalize any in-flight recognition segment.
    Commit,
}

impl RealtimeRequest {
    pub fn input_audio(samples: &[i16]) -> Self {
        use base64::Engine;

        let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        Self::InputAudio {
            audio_base_64: base64::engine::general_purpose::STANDARD.encode(&bytes),
        }
    }
}

/// Word-level timing attached to timestamped committed transcripts.
#[derive(Debug, Clone, Deserialize)]
pub struct WordTiming {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub start: f64,
    #[serde(default)]
    pub end: f64,
}

/// Events received from the recognition service.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RealtimeEvent {
    SessionStarted {
        #[serde(default)]
        session_id: String,
    },
    PartialTranscript {
        #[serde(default)]
        text: String,
    },
    CommittedTranscript {
        #[serde(default)]
        text: String,
    },
    CommittedTranscriptWithTimestamps {
        #[serde(default)]
        text: String,
        #[serde(default)]
        words: Vec<WordTiming>,
    },
    Error {
        #[serde(default)]
        message: String,
    },
    /// Forward-compatible catch-all so unknown event types never fail
    /// deserialization.
    #[serde(other)]
    Unknown,
}

/// Decoded recognition event, as consumed by the session coordinator.
///
/// Produced by the upstream receiver, consumed exactly once; never
/// persisted directly.
#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptEvent {
    SessionStarted,
    Partial { text: String },
    Committed { text: String },
    Error { message: String },
    Closed,
}

/// Map a wire event to the coordinator's event type.
///
/// The service can emit both committed variants for the same segment;
/// consuming only the configured one avoids duplicate output.
pub fn translate_event(event: RealtimeEvent, include_timestamps: bool) -> Option<TranscriptEvent> {
    match event {
        RealtimeEvent::SessionStarted { .. } => Some(TranscriptEvent::SessionStarted),
        RealtimeEvent::PartialTranscript { text } => Some(TranscriptEvent::Partial { text }),
        RealtimeEvent::CommittedTranscript { text } if !include_timestamps => {
            Some(TranscriptEvent::Committed { text })
        }
        RealtimeEvent::CommittedTranscriptWithTimestamps { text, .. } if include_timestamps => {
            Some(TranscriptEvent::Committed { text })
        }
        RealtimeEvent::Error { message } => Some(TranscriptEvent::Error { message }),
        RealtimeEvent::CommittedTranscript { .. }
        | RealtimeEvent::CommittedTranscriptWithTimestamps { .. }
        | RealtimeEvent::Unknown => None,
    }
}
