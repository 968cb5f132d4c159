use crate::session::{ReconcileConfig, SessionConfig};
use crate::upstream::{CommitStrategy, RealtimeOptions, VadOptions};
use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub audio: AudioSettings,
    pub upstream: UpstreamSettings,
    pub storage: StorageSettings,
    pub reconcile: ReconcileSettings,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct AudioSettings {
    pub sample_rate: u32,
    pub chunk_ms: u32,
    pub queue_capacity: usize,
}

#[derive(Debug, Deserialize)]
pub struct UpstreamSettings {
    pub url: String,
    pub model_id: String,
    pub commit_strategy: CommitStrategy,
    #[serde(default)]
    pub language_code: Option<String>,
    #[serde(default)]
    pub include_timestamps: bool,
    pub vad_silence_threshold_secs: f32,
    pub vad_threshold: f32,
    pub min_speech_duration_ms: u32,
    pub min_silence_duration_ms: u32,
    pub final_commit_wait_ms: u64,
    pub drain_timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct StorageSettings {
    pub data_dir: String,
}

#[derive(Debug, Deserialize)]
pub struct ReconcileSettings {
    pub gap_threshold_secs: u64,
    pub max_overlap_chars: usize,
    pub min_overlap_chars: usize,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Per-session pipeline settings derived from the loaded file.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            sample_rate: self.audio.sample_rate,
            chunk_ms: self.audio.chunk_ms,
            queue_capacity: self.audio.queue_capacity,
            final_commit_wait: Duration::from_millis(self.upstream.final_commit_wait_ms),
            drain_timeout: Duration::from_millis(self.upstream.drain_timeout_ms),
            ..SessionConfig::default()
        }
    }

    pub fn reconcile_config(&self) -> ReconcileConfig {
        ReconcileConfig {
            gap_threshold: Duration::from_secs(self.reconcile.gap_threshold_secs),
            max_overlap_chars: self.reconcile.max_overlap_chars,
            min_overlap_chars: self.reconcile.min_overlap_chars,
        }
    }

    /// Recognition-service connection options. The API key is supplied by
    /// the caller (it comes from the environment, not the config file).
    pub fn realtime_options(&self, api_key: String) -> RealtimeOptions {
        RealtimeOptions {
            url: self.upstream.url.clone(),
            api_key,
            model_id: self.upstream.model_id.clone(),
            sample_rate: self.audio.sample_rate,
            commit_strategy: self.upstream.commit_strategy,
            language_code: self.upstream.language_code.clone(),
            include_timestamps: self.upstream.include_timestamps,
            vad: VadOptions {
                silence_threshold_secs: self.upstream.vad_silence_threshold_secs,
                threshold: self.upstream.vad_threshold,
                min_speech_duration_ms: self.upstream.min_speech_duration_ms,
                min_silence_duration_ms: self.upstream.min_silence_duration_ms,
            },
        }
    }
}
