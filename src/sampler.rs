//! Delta sampling over monotonic counters.
//!
//! Cumulative counters (bytes received, disk reads) only grow until the
//! process that owns them restarts. [`RateSampler`] turns successive
//! readings into per-interval deltas: the first reading of a key yields 0,
//! and a reading lower than the previous one (a reset) also yields 0.
//!
//! The sampler does not look at the clock. A result is "delta per call";
//! it is a per-second rate only when the caller samples once per second.

use std::collections::HashMap;

/// Per-key last-value memory for delta computation.
///
/// Owned by the view that needs it and dropped (or [`reset`](Self::reset))
/// when that view goes away, so re-entering always bootstraps again.
#[derive(Debug, Clone, Default)]
pub struct RateSampler {
    last: HashMap<String, u64>,
}

impl RateSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `current` for `key` and return the delta since the previous
    /// reading.
    pub fn sample(&mut self, key: &str, current: u64) -> u64 {
        match self.last.insert(key.to_string(), current) {
            Some(previous) => current.saturating_sub(previous),
            None => 0,
        }
    }

    /// The last recorded reading for `key`.
    pub fn last_value(&self, key: &str) -> Option<u64> {
        self.last.get(key).copied()
    }

    /// Forget every key.
    pub fn reset(&mut self) {
        self.last.clear();
    }

    pub fn len(&self) -> usize {
        self.last.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last.is_empty()
    }
}
