use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a stored session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Recording,
    Completed,
}

/// Session metadata record, written at session start and finalized once on
/// stop. A record still marked `recording` on disk is a session that never
/// finalized cleanly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionMetadata {
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub status: SessionStatus,
    pub duration_secs: u64,
    pub segment_count: usize,
}

/// One deduplicated unit of committed transcript text.
///
/// Immutable once created. Read in order, segments concatenate to the
/// session transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// A stored session as returned by the listing API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingSummary {
    pub id: String,
    #[serde(flatten)]
    pub metadata: SessionMetadata,
}
