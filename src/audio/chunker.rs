use anyhow::Result;

use super::sink::StreamAudioSink;

/// A fixed-length buffer of 16-bit PCM samples.
///
/// `source_len` is the sample count of the originating frame, so short
/// (zero-padded) final frames remain detectable downstream.
#[derive(Debug, Clone)]
pub struct AudioChunk {
    pub samples: Vec<i16>,
    pub source_len: usize,
}

impl AudioChunk {
    pub fn duration_ms(&self, sample_rate: u32) -> u64 {
        (self.samples.len() as u64 * 1000) / sample_rate as u64
    }
}

/// Normalizes incoming sample frames to exact fixed-size chunks.
///
/// Every produced chunk contains exactly `chunk_samples` samples: shorter
/// frames (typically the last one before stream end) are zero-padded,
/// longer frames are truncated. A frame is never split across two chunks.
/// Each chunk is appended to the persistent audio sink before it is handed
/// back for queueing, so the full session audio survives dropped chunks.
pub struct AudioChunker {
    chunk_samples: usize,
    sink: StreamAudioSink,
}

impl AudioChunker {
    pub fn new(chunk_samples: usize, sink: StreamAudioSink) -> Self {
        Self {
            chunk_samples,
            sink,
        }
    }

    /// Turn one incoming frame into one exact-size chunk, writing it to the
    /// audio sink on the way.
    pub fn ingest(&mut self, frame: &[i16]) -> Result<AudioChunk> {
        let samples = if frame.len() == self.chunk_samples {
            frame.to_vec()
        } else {
            let mut padded = vec![0i16; self.chunk_samples];
            let keep = frame.len().min(self.chunk_samples);
            padded[..keep].copy_from_slice(&frame[..keep]);
            padded
        };

        self.sink.write_samples(&samples)?;

        Ok(AudioChunk {
            samples,
            source_len: frame.len(),
        })
    }

    pub fn chunk_samples(&self) -> usize {
        self.chunk_samples
    }

    /// Close the audio sink. The WAV artifact is complete after this.
    pub fn finish(self) -> Result<()> {
        self.sink.finalize()
    }
}
