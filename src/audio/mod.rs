pub mod chunker;
pub mod queue;
pub mod sink;

pub use chunker::{AudioChunk, AudioChunker};
pub use queue::BoundedChunkQueue;
pub use sink::StreamAudioSink;
