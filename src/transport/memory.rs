//! In-memory display link.
//!
//! Records every frame write instead of sending it anywhere. Clones share the
//! same recording, so a test can keep one handle while the writer thread owns
//! another. Used by the test suite and by `--dry-run`, which logs each
//! command's payload hex.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use tracing::info;

use super::DisplayLink;
use crate::display::DisplayConfig;
use crate::error::FlipdotError;
use crate::protocol::commands;
use crate::protocol::packing::to_hex;

/// Writes kept when no explicit capacity is given.
pub const DEFAULT_HISTORY: usize = 1024;

#[derive(Debug, Default)]
struct Recording {
    writes: VecDeque<Vec<u8>>,
    total: u64,
    failing: bool,
}

#[derive(Debug, Clone)]
pub struct MemoryLink {
    recording: Arc<Mutex<Recording>>,
    capacity: usize,
    delay: Duration,
    /// Log decoded commands on every write
    log_config: Option<DisplayConfig>,
}

impl Default for MemoryLink {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLink {
    pub fn new() -> Self {
        Self {
            recording: Arc::new(Mutex::new(Recording::default())),
            capacity: DEFAULT_HISTORY,
            delay: Duration::ZERO,
            log_config: None,
        }
    }

    /// Link that logs each frame's command hex, for dry runs.
    pub fn dry_run(config: DisplayConfig) -> Self {
        Self {
            log_config: Some(config),
            ..Self::new()
        }
    }

    /// Keep at most `capacity` writes (oldest are discarded).
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    /// Sleep this long inside every write, like a slow serial line.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Make subsequent writes fail with a transport error.
    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }

    /// Recorded writes, oldest first.
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.lock().writes.iter().cloned().collect()
    }

    pub fn last_write(&self) -> Option<Vec<u8>> {
        self.lock().writes.back().cloned()
    }

    /// Successful writes since creation, including discarded ones.
    pub fn total_writes(&self) -> u64 {
        self.lock().total
    }

    fn lock(&self) -> MutexGuard<'_, Recording> {
        // Poisoned by a panicking holder; the data is still consistent
        self.recording.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn log(&self, config: &DisplayConfig, bytes: &[u8]) {
        match commands::parse_frame(bytes, config) {
            Ok([top, bottom]) => info!(
                top = %top.payload_hex(),
                bottom = %bottom.payload_hex(),
                "Dry-run frame"
            ),
            Err(e) => info!(bytes = %to_hex(bytes), error = %e, "Dry-run write"),
        }
    }
}

impl DisplayLink for MemoryLink {
    fn write_frame(&mut self, bytes: &[u8]) -> Result<(), FlipdotError> {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        let mut recording = self.lock();
        if recording.failing {
            return Err(FlipdotError::Transport("memory link set to fail".to_string()));
        }
        if recording.writes.len() >= self.capacity {
            recording.writes.pop_front();
        }
        recording.writes.push_back(bytes.to_vec());
        recording.total += 1;
        drop(recording);

        if let Some(config) = &self.log_config {
            self.log(config, bytes);
        }
        Ok(())
    }

    fn describe(&self) -> String {
        if self.log_config.is_some() {
            "dry run".to_string()
        } else {
            "memory".to_string()
        }
    }
}
