//! Pipeline counters.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Shared counters, updated lock-free by every pipeline stage.
#[derive(Debug, Default)]
pub struct PipelineStats {
    produced: AtomicU64,
    rejected: AtomicU64,
    dropped: AtomicU64,
    split: AtomicU64,
    written: AtomicU64,
    write_failures: AtomicU64,
}

/// Point-in-time copy of [`PipelineStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StatsSnapshot {
    /// Frames handed to the transport (producer and WebSocket clients)
    pub produced: u64,
    /// Frames that failed validation
    pub rejected: u64,
    /// Frames dropped at the transport (backlog full or closed)
    pub dropped: u64,
    /// Frames that reached the panel splitter
    pub split: u64,
    /// Frames written to the link
    pub written: u64,
    /// Link write errors
    pub write_failures: u64,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_produced(&self) {
        self.produced.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_split(&self) {
        self.split.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_written(&self) {
        self.written.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_write_failure(&self) {
        self.write_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            produced: self.produced.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            split: self.split.load(Ordering::Relaxed),
            written: self.written.load(Ordering::Relaxed),
            write_failures: self.write_failures.load(Ordering::Relaxed),
        }
    }
}
