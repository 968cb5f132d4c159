//! Durable artifacts, one directory per session:
//! `metadata.json`, `transcript.json`, and `audio.wav`.

pub mod records;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub use records::{MeetingSummary, Segment, SessionMetadata, SessionStatus};

const METADATA_FILE: &str = "metadata.json";
const TRANSCRIPT_FILE: &str = "transcript.json";
const AUDIO_FILE: &str = "audio.wav";

/// Filesystem store for session artifacts.
#[derive(Debug, Clone)]
pub struct MeetingStore {
    root: PathBuf,
}

impl MeetingStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("Failed to create data directory {:?}", self.root))
    }

    pub fn session_dir(&self, session_id: &str) -> PathBuf {
        self.root.join(session_id)
    }

    pub fn audio_path(&self, session_id: &str) -> PathBuf {
        self.session_dir(session_id).join(AUDIO_FILE)
    }

    pub fn exists(&self, session_id: &str) -> bool {
        self.session_dir(session_id).is_dir()
    }

    pub fn create_session(&self, session_id: &str) -> Result<PathBuf> {
        let dir = self.session_dir(session_id);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create session directory {:?}", dir))?;
        Ok(dir)
    }

    /// Best-effort removal of a partially created session (start failures).
    pub fn discard_session(&self, session_id: &str) {
        let dir = self.session_dir(session_id);
        if let Err(e) = fs::remove_dir_all(&dir) {
            warn!("Failed to discard session directory {:?}: {}", dir, e);
        }
    }

    pub fn write_metadata(&self, session_id: &str, metadata: &SessionMetadata) -> Result<()> {
        let path = self.session_dir(session_id).join(METADATA_FILE);
        let json = serde_json::to_string_pretty(metadata)?;
        fs::write(&path, json).with_context(|| format!("Failed to write {:?}", path))
    }

    pub fn load_metadata(&self, session_id: &str) -> Result<SessionMetadata> {
        let path = self.session_dir(session_id).join(METADATA_FILE);
        let json =
            fs::read_to_string(&path).with_context(|| format!("Failed to read {:?}", path))?;
        serde_json::from_str(&json).with_context(|| format!("Invalid metadata in {:?}", path))
    }

    pub fn write_transcript(&self, session_id: &str, segments: &[Segment]) -> Result<()> {
        let path = self.session_dir(session_id).join(TRANSCRIPT_FILE);
        let json = serde_json::to_string_pretty(segments)?;
        fs::write(&path, json).with_context(|| format!("Failed to write {:?}", path))
    }

    pub fn load_transcript(&self, session_id: &str) -> Result<Vec<Segment>> {
        let path = self.session_dir(session_id).join(TRANSCRIPT_FILE);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let json =
            fs::read_to_string(&path).with_context(|| format!("Failed to read {:?}", path))?;
        serde_json::from_str(&json).with_context(|| format!("Invalid transcript in {:?}", path))
    }

    /// All stored sessions, newest first. Directories without readable
    /// metadata are skipped.
    pub fn list(&self) -> Result<Vec<MeetingSummary>> {
        let mut meetings = Vec::new();

        if !self.root.exists() {
            return Ok(meetings);
        }

        for entry in fs::read_dir(&self.root)
            .with_context(|| format!("Failed to read data directory {:?}", self.root))?
        {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }

            let id = entry.file_name().to_string_lossy().to_string();
            match self.load_metadata(&id) {
                Ok(metadata) => meetings.push(MeetingSummary { id, metadata }),
                Err(e) => warn!("Skipping session {}: {}", id, e),
            }
        }

        meetings.sort_by(|a, b| b.metadata.created_at.cmp(&a.metadata.created_at));

        Ok(meetings)
    }

    pub fn delete(&self, session_id: &str) -> Result<bool> {
        let dir = self.session_dir(session_id);
        if !dir.exists() {
            return Ok(false);
        }
        fs::remove_dir_all(&dir)
            .with_context(|| format!("Failed to delete session directory {:?}", dir))?;
        Ok(true)
    }
}
