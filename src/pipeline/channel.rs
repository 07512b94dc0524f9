//! # Frame Transport
//!
//! Bounded hand-off between frame producers and the serial writer.
//!
//! ## Backlog Policy
//!
//! **Drop-newest.** When the queue already holds `depth` frames the incoming
//! frame is dropped and counted. The producer never waits on the writer, so a
//! slow serial line cannot stall the frame-rate timer.
//!
//! When the receiving side is gone, sending is a silent no-op.

use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::debug;

use super::stats::PipelineStats;
use crate::frame::BitFrame;

/// Default queue depth between producer and writer.
pub const DEFAULT_DEPTH: usize = 4;

/// What happened to a sent frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Queued,
    /// Backlog full
    DroppedFull,
    /// Writer gone
    DroppedClosed,
}

/// Producer end. Cheap to clone; every producer holds one.
#[derive(Debug, Clone)]
pub struct FrameSender {
    tx: mpsc::Sender<BitFrame>,
    stats: Arc<PipelineStats>,
}

/// Writer end.
#[derive(Debug)]
pub struct FrameReceiver {
    rx: mpsc::Receiver<BitFrame>,
}

/// Create a transport holding at most `depth` frames.
pub fn frame_channel(depth: usize, stats: Arc<PipelineStats>) -> (FrameSender, FrameReceiver) {
    let (tx, rx) = mpsc::channel(depth.max(1));
    (FrameSender { tx, stats }, FrameReceiver { rx })
}

impl FrameSender {
    /// Hand a frame off without waiting.
    pub fn send(&self, frame: BitFrame) -> SendOutcome {
        self.stats.record_produced();
        match self.tx.try_send(frame) {
            Ok(()) => SendOutcome::Queued,
            Err(TrySendError::Full(_)) => {
                self.stats.record_dropped();
                debug!("Transport backlog full, frame dropped");
                SendOutcome::DroppedFull
            }
            Err(TrySendError::Closed(_)) => {
                self.stats.record_dropped();
                SendOutcome::DroppedClosed
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    pub fn stats(&self) -> &Arc<PipelineStats> {
        &self.stats
    }
}

impl FrameReceiver {
    pub async fn recv(&mut self) -> Option<BitFrame> {
        self.rx.recv().await
    }

    /// Blocking receive for the writer thread. Must not be called from async code.
    pub fn blocking_recv(&mut self) -> Option<BitFrame> {
        self.rx.blocking_recv()
    }
}
