use std::time::{Duration, Instant};

/// Tuning for committed-text reconciliation.
///
/// The overlap bounds are heuristics carried over from production tuning;
/// they are configuration, not fixed truths.
#[derive(Debug, Clone)]
pub struct ReconcileConfig {
    /// Commits further apart than this are unrelated utterances.
    pub gap_threshold: Duration,
    /// Longest suffix/prefix overlap considered.
    pub max_overlap_chars: usize,
    /// Shortest overlap accepted; anything smaller is coincidence.
    pub min_overlap_chars: usize,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            gap_threshold: Duration::from_secs(8),
            max_overlap_chars: 220,
            min_overlap_chars: 20,
        }
    }
}

/// Turns a stream of possibly-overlapping committed-text fragments into
/// append-only transcript deltas.
///
/// The recognition service re-segments near speech boundaries, so a commit
/// may repeat, extend, or partially overlap the previous one. `reconcile`
/// returns only the text not already emitted, or `None` when the commit
/// contains nothing new. State is scoped to one session and mutated from a
/// single task.
#[derive(Debug)]
pub struct ReconciliationEngine {
    config: ReconcileConfig,
    last_text: String,
    last_at: Option<Instant>,
}

impl ReconciliationEngine {
    pub fn new(config: ReconcileConfig) -> Self {
        Self {
            config,
            last_text: String::new(),
            last_at: None,
        }
    }

    /// Compute the non-duplicated delta for one committed fragment.
    ///
    /// `now` is injected rather than sampled so the gap heuristic is
    /// deterministic under test.
    pub fn reconcile(&mut self, text: &str, now: Instant) -> Option<String> {
        let current = text.trim();
        if current.is_empty() {
            return None;
        }

        // First commit of the session.
        if self.last_text.is_empty() {
            self.remember(current, now);
            return Some(current.to_string());
        }

        // Commits far apart are independent utterances, regardless of any
        // textual overlap.
        if let Some(last_at) = self.last_at {
            if now.duration_since(last_at) > self.config.gap_threshold {
                self.remember(current, now);
                return Some(current.to_string());
            }
        }

        // Exact duplicate. The remembered timestamp is intentionally NOT
        // refreshed: the gap is measured from the last distinct commit.
        if current == self.last_text {
            return None;
        }

        // Progressive extension of the previous commit.
        if current.starts_with(&self.last_text) {
            let delta = current[self.last_text.len()..].trim_start().to_string();
            self.remember(current, now);
            return if delta.is_empty() { None } else { Some(delta) };
        }

        // Shrinking re-segmentation: everything was already emitted.
        if self.last_text.starts_with(current) {
            return None;
        }

        // Largest overlap that is a suffix of the previous commit and a
        // prefix of the current one, searched longest-first down to the
        // configured floor. Counted in chars so multi-byte text is safe.
        let previous: Vec<char> = self.last_text.chars().collect();
        let chars: Vec<char> = current.chars().collect();
        let max_overlap = previous
            .len()
            .min(chars.len())
            .min(self.config.max_overlap_chars);

        let mut overlap = 0;
        for size in (self.config.min_overlap_chars..=max_overlap).rev() {
            if previous[previous.len() - size..] == chars[..size] {
                overlap = size;
                break;
            }
        }

        self.remember(current, now);

        if overlap > 0 {
            let delta: String = chars[overlap..].iter().collect();
            let delta = delta.trim_start().to_string();
            if delta.is_empty() {
                None
            } else {
                Some(delta)
            }
        } else {
            Some(current.to_string())
        }
    }

    /// Forget all state, as at session start.
    pub fn reset(&mut self) {
        self.last_text.clear();
        self.last_at = None;
    }

    fn remember(&mut self, text: &str, now: Instant) {
        self.last_text = text.to_string();
        self.last_at = Some(now);
    }
}
