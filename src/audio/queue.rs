use std::collections::VecDeque;
use std::sync::Mutex;

use super::chunker::AudioChunk;

/// Fixed-capacity chunk queue with a drop-oldest overflow policy.
///
/// Decouples the producer-ingest path from the network-send path. Both
/// `push` and `pop` are non-blocking; when the queue is full the single
/// oldest entry is evicted to admit the new chunk, and if that still cannot
/// make room the new chunk is dropped without error.
pub struct BoundedChunkQueue {
    inner: Mutex<VecDeque<AudioChunk>>,
    capacity: usize,
}

impl BoundedChunkQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Enqueue a chunk, evicting the oldest entry if at capacity.
    pub fn push(&self, chunk: AudioChunk) {
        let mut queue = self.inner.lock().unwrap();

        if queue.len() >= self.capacity {
            queue.pop_front();
        }
        if queue.len() < self.capacity {
            queue.push_back(chunk);
        }
    }

    /// Dequeue the oldest chunk, if any.
    pub fn pop(&self) -> Option<AudioChunk> {
        self.inner.lock().unwrap().pop_front()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
