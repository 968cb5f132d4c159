// Serde-shape tests for the control plane and the recognition-service wire
// protocol.

use base64::Engine;
use meeting_scribe::upstream::messages::{translate_event, RealtimeEvent, RealtimeRequest};
use meeting_scribe::{
    CommitStrategy, ControlMessage, RealtimeOptions, ServerEvent, TranscriptEvent, VadOptions,
};

fn options() -> RealtimeOptions {
    RealtimeOptions {
        url: "wss://recognition.test/realtime".to_string(),
        api_key: "k".to_string(),
        model_id: "scribe_v2_realtime".to_string(),
        sample_rate: 16000,
        commit_strategy: CommitStrategy::Vad,
        language_code: None,
        include_timestamps: false,
        vad: VadOptions::default(),
    }
}

// ============================================================================
// Control plane
// ============================================================================

#[test]
fn test_start_message_parses_with_and_without_fields() {
    let msg: ControlMessage =
        serde_json::from_str(r#"{"type":"start","title":"Standup","language":"en"}"#).unwrap();
    match msg {
        ControlMessage::Start { title, language } => {
            assert_eq!(title.as_deref(), Some("Standup"));
            assert_eq!(language.as_deref(), Some("en"));
        }
        other => panic!("Expected start, got {:?}", other),
    }

    let msg: ControlMessage = serde_json::from_str(r#"{"type":"start"}"#).unwrap();
    assert!(matches!(
        msg,
        ControlMessage::Start {
            title: None,
            language: None
        }
    ));
}

#[test]
fn test_audio_and_stop_messages_parse() {
    let msg: ControlMessage =
        serde_json::from_str(r#"{"type":"audio","data":"AAAA"}"#).unwrap();
    assert!(matches!(msg, ControlMessage::Audio { data } if data == "AAAA"));

    let msg: ControlMessage = serde_json::from_str(r#"{"type":"stop"}"#).unwrap();
    assert!(matches!(msg, ControlMessage::Stop));
}

#[test]
fn test_unknown_control_message_is_tolerated() {
    let msg: ControlMessage =
        serde_json::from_str(r#"{"type":"subscribe","channel":"x"}"#).unwrap();
    assert_eq!(msg.kind(), "unknown");
    assert!(matches!(msg, ControlMessage::Unknown));
}

#[test]
fn test_server_events_serialize_with_type_tags() {
    let json = serde_json::to_string(&ServerEvent::SessionStarted {
        session_id: "20260806_101500_ab12cd".to_string(),
    })
    .unwrap();
    assert!(json.contains(r#""type":"session_started""#));
    assert!(json.contains(r#""session_id":"20260806_101500_ab12cd""#));

    let json = serde_json::to_string(&ServerEvent::Committed {
        text: "hello".to_string(),
    })
    .unwrap();
    assert!(json.contains(r#""type":"committed""#));

    let json = serde_json::to_string(&ServerEvent::Error {
        message: "boom".to_string(),
    })
    .unwrap();
    assert!(json.contains(r#""type":"error""#));
}

// ============================================================================
// Recognition-service wire protocol
// ============================================================================

#[test]
fn test_input_audio_request_encodes_little_endian_pcm() {
    let request = RealtimeRequest::input_audio(&[0x1234, 0x5678]);
    let json = serde_json::to_string(&request).unwrap();
    assert!(json.contains(r#""type":"input_audio""#));

    match request {
        RealtimeRequest::InputAudio { audio_base_64 } => {
            let decoded = base64::engine::general_purpose::STANDARD
                .decode(audio_base_64)
                .unwrap();
            assert_eq!(decoded, vec![0x34, 0x12, 0x78, 0x56]);
        }
        other => panic!("Expected input_audio, got {:?}", other),
    }
}

#[test]
fn test_commit_request_serializes() {
    let json = serde_json::to_string(&RealtimeRequest::Commit).unwrap();
    assert!(json.contains(r#""type":"commit""#));
}

#[test]
fn test_realtime_events_deserialize() {
    let event: RealtimeEvent =
        serde_json::from_str(r#"{"type":"partial_transcript","text":"hel"}"#).unwrap();
    assert!(matches!(event, RealtimeEvent::PartialTranscript { text } if text == "hel"));

    let event: RealtimeEvent =
        serde_json::from_str(r#"{"type":"committed_transcript","text":"hello"}"#).unwrap();
    assert!(matches!(event, RealtimeEvent::CommittedTranscript { text } if text == "hello"));

    let event: RealtimeEvent = serde_json::from_str(
        r#"{"type":"committed_transcript_with_timestamps","text":"hello",
            "words":[{"text":"hello","start":0.1,"end":0.4}]}"#,
    )
    .unwrap();
    match event {
        RealtimeEvent::CommittedTranscriptWithTimestamps { text, words } => {
            assert_eq!(text, "hello");
            assert_eq!(words.len(), 1);
            assert_eq!(words[0].text, "hello");
        }
        other => panic!("Expected timestamped commit, got {:?}", other),
    }

    let event: RealtimeEvent =
        serde_json::from_str(r#"{"type":"error","message":"bad key"}"#).unwrap();
    assert!(matches!(event, RealtimeEvent::Error { message } if message == "bad key"));

    let event: RealtimeEvent =
        serde_json::from_str(r#"{"type":"some_future_event","x":1}"#).unwrap();
    assert!(matches!(event, RealtimeEvent::Unknown));
}

#[test]
fn test_only_configured_committed_variant_is_consumed() {
    let plain = RealtimeEvent::CommittedTranscript {
        text: "hello".to_string(),
    };
    let timestamped = RealtimeEvent::CommittedTranscriptWithTimestamps {
        text: "hello".to_string(),
        words: Vec::new(),
    };

    assert_eq!(
        translate_event(plain.clone(), false),
        Some(TranscriptEvent::Committed {
            text: "hello".to_string()
        })
    );
    assert_eq!(translate_event(timestamped.clone(), false), None);

    assert_eq!(translate_event(plain, true), None);
    assert_eq!(
        translate_event(timestamped, true),
        Some(TranscriptEvent::Committed {
            text: "hello".to_string()
        })
    );
}

#[test]
fn test_endpoint_url_carries_session_configuration() {
    let mut options = options();
    options.language_code = Some("en".to_string());

    let url = options.endpoint_url();
    assert!(url.starts_with("wss://recognition.test/realtime?"));
    assert!(url.contains("model_id=scribe_v2_realtime"));
    assert!(url.contains("audio_format=pcm_16000"));
    assert!(url.contains("sample_rate=16000"));
    assert!(url.contains("commit_strategy=vad"));
    assert!(url.contains("language_code=en"));
    assert!(url.contains("vad_threshold=0.25"));
}

#[test]
fn test_manual_commit_strategy_omits_vad_tuning() {
    let mut options = options();
    options.commit_strategy = CommitStrategy::Manual;

    let url = options.endpoint_url();
    assert!(url.contains("commit_strategy=manual"));
    assert!(!url.contains("vad_threshold"));
}

#[test]
fn test_commit_strategy_serde_names() {
    assert_eq!(serde_json::to_string(&CommitStrategy::Vad).unwrap(), r#""vad""#);
    let parsed: CommitStrategy = serde_json::from_str(r#""manual""#).unwrap();
    assert_eq!(parsed, CommitStrategy::Manual);
}
