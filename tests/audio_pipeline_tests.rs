// Tests for the audio ingest path: fixed-size chunking, the WAV sink, and
// the bounded queue's overflow policy.

use anyhow::Result;
use meeting_scribe::{AudioChunker, BoundedChunkQueue, StreamAudioSink};
use tempfile::TempDir;

fn test_sink(dir: &TempDir) -> Result<StreamAudioSink> {
    Ok(StreamAudioSink::create(dir.path().join("audio.wav"), 16000)?)
}

#[test]
fn test_short_frame_is_zero_padded() -> Result<()> {
    let dir = TempDir::new()?;
    let mut chunker = AudioChunker::new(8, test_sink(&dir)?);

    let chunk = chunker.ingest(&[1, 2, 3])?;

    assert_eq!(chunk.samples, vec![1, 2, 3, 0, 0, 0, 0, 0]);
    assert_eq!(chunk.source_len, 3);

    Ok(())
}

#[test]
fn test_long_frame_is_truncated_not_split() -> Result<()> {
    let dir = TempDir::new()?;
    let mut chunker = AudioChunker::new(4, test_sink(&dir)?);

    let chunk = chunker.ingest(&[1, 2, 3, 4, 5, 6])?;

    // One frame in, exactly one chunk out.
    assert_eq!(chunk.samples, vec![1, 2, 3, 4]);
    assert_eq!(chunk.source_len, 6);

    Ok(())
}

#[test]
fn test_exact_frame_passes_through() -> Result<()> {
    let dir = TempDir::new()?;
    let mut chunker = AudioChunker::new(4, test_sink(&dir)?);

    let chunk = chunker.ingest(&[5, 6, 7, 8])?;

    assert_eq!(chunk.samples, vec![5, 6, 7, 8]);
    assert_eq!(chunk.source_len, 4);

    Ok(())
}

#[test]
fn test_every_chunk_lands_in_the_wav_sink() -> Result<()> {
    let dir = TempDir::new()?;
    let wav_path = dir.path().join("audio.wav");

    let sink = StreamAudioSink::create(&wav_path, 16000)?;
    let mut chunker = AudioChunker::new(4, sink);

    chunker.ingest(&[1, 2, 3, 4])?;
    chunker.ingest(&[5, 6])?; // short final frame, padded
    chunker.finish()?;

    let reader = hound::WavReader::open(&wav_path)?;
    let spec = reader.spec();
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, 16000);
    assert_eq!(spec.bits_per_sample, 16);

    let samples: Vec<i16> = reader.into_samples::<i16>().collect::<Result<_, _>>()?;
    assert_eq!(samples, vec![1, 2, 3, 4, 5, 6, 0, 0]);

    Ok(())
}

#[test]
fn test_queue_overflow_drops_oldest_without_error() -> Result<()> {
    let dir = TempDir::new()?;
    let mut chunker = AudioChunker::new(2, test_sink(&dir)?);
    let queue = BoundedChunkQueue::new(3);

    // A, B, C, D into a queue of three: A is evicted, nothing panics.
    for marker in [10, 20, 30, 40] {
        queue.push(chunker.ingest(&[marker, marker])?);
    }

    assert_eq!(queue.len(), 3);
    assert_eq!(queue.pop().unwrap().samples, vec![20, 20]);
    assert_eq!(queue.pop().unwrap().samples, vec![30, 30]);
    assert_eq!(queue.pop().unwrap().samples, vec![40, 40]);
    assert!(queue.is_empty());

    Ok(())
}

#[test]
fn test_sink_survives_audio_even_when_queue_drops() -> Result<()> {
    let dir = TempDir::new()?;
    let wav_path = dir.path().join("audio.wav");

    let mut chunker = AudioChunker::new(2, StreamAudioSink::create(&wav_path, 16000)?);
    let queue = BoundedChunkQueue::new(1);

    for marker in [1, 2, 3] {
        queue.push(chunker.ingest(&[marker, marker])?);
    }
    chunker.finish()?;

    // Only the newest chunk survived the queue...
    assert_eq!(queue.pop().unwrap().samples, vec![3, 3]);

    // ...but the sink kept everything.
    let reader = hound::WavReader::open(&wav_path)?;
    let samples: Vec<i16> = reader.into_samples::<i16>().collect::<Result<_, _>>()?;
    assert_eq!(samples, vec![1, 1, 2, 2, 3, 3]);

    Ok(())
}
