// Tests for the session artifact store

use anyhow::Result;
use chrono::{Duration, Utc};
use meeting_scribe::{MeetingStore, Segment, SessionMetadata, SessionStatus};
use std::fs;
use tempfile::TempDir;

fn metadata(title: &str, minutes_ago: i64) -> SessionMetadata {
    SessionMetadata {
        title: title.to_string(),
        created_at: Utc::now() - Duration::minutes(minutes_ago),
        status: SessionStatus::Completed,
        duration_secs: 60,
        segment_count: 1,
    }
}

#[test]
fn test_metadata_roundtrip() -> Result<()> {
    let dir = TempDir::new()?;
    let store = MeetingStore::new(dir.path());

    store.create_session("session-a")?;
    let written = metadata("Weekly sync", 0);
    store.write_metadata("session-a", &written)?;

    let loaded = store.load_metadata("session-a")?;
    assert_eq!(loaded.title, "Weekly sync");
    assert_eq!(loaded.status, SessionStatus::Completed);
    assert_eq!(loaded.created_at, written.created_at);
    assert_eq!(loaded.duration_secs, 60);
    assert_eq!(loaded.segment_count, 1);

    Ok(())
}

#[test]
fn test_transcript_roundtrip_preserves_order() -> Result<()> {
    let dir = TempDir::new()?;
    let store = MeetingStore::new(dir.path());

    store.create_session("session-a")?;
    let segments = vec![
        Segment {
            text: "first".to_string(),
            timestamp: Utc::now(),
        },
        Segment {
            text: "second".to_string(),
            timestamp: Utc::now(),
        },
    ];
    store.write_transcript("session-a", &segments)?;

    let loaded = store.load_transcript("session-a")?;
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].text, "first");
    assert_eq!(loaded[1].text, "second");

    Ok(())
}

#[test]
fn test_missing_transcript_loads_empty() -> Result<()> {
    let dir = TempDir::new()?;
    let store = MeetingStore::new(dir.path());

    store.create_session("session-a")?;
    assert!(store.load_transcript("session-a")?.is_empty());

    Ok(())
}

#[test]
fn test_list_is_newest_first_and_skips_invalid_dirs() -> Result<()> {
    let dir = TempDir::new()?;
    let store = MeetingStore::new(dir.path());

    store.create_session("oldest")?;
    store.write_metadata("oldest", &metadata("Oldest", 30))?;
    store.create_session("middle")?;
    store.write_metadata("middle", &metadata("Middle", 20))?;
    store.create_session("newest")?;
    store.write_metadata("newest", &metadata("Newest", 10))?;

    // A directory without metadata is not a session.
    fs::create_dir(dir.path().join("junk"))?;

    let listed = store.list()?;
    let ids: Vec<&str> = listed.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["newest", "middle", "oldest"]);

    Ok(())
}

#[test]
fn test_delete_removes_session_dir() -> Result<()> {
    let dir = TempDir::new()?;
    let store = MeetingStore::new(dir.path());

    store.create_session("session-a")?;
    store.write_metadata("session-a", &metadata("Gone soon", 0))?;

    assert!(store.delete("session-a")?);
    assert!(!store.exists("session-a"));
    assert!(!store.delete("session-a")?);

    Ok(())
}

#[test]
fn test_init_creates_nested_root() -> Result<()> {
    let dir = TempDir::new()?;
    let store = MeetingStore::new(dir.path().join("data").join("meetings"));

    store.init()?;
    assert!(store.root().is_dir());
    assert!(store.list()?.is_empty());

    Ok(())
}
