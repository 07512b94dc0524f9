//! # Serial Writer
//!
//! Owns the display link and writes one frame at a time, in arrival order.
//! Runs on a dedicated OS thread so blocking serial writes never touch the
//! async runtime that drives the producer.
//!
//! Failures are local: a rejected frame or a failed write is logged and the
//! frame is dropped. The thread exits once every sender is gone.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, error, info};

use super::channel::FrameReceiver;
use super::encoder::Encoder;
use super::stats::PipelineStats;
use crate::frame::BitFrame;
use crate::transport::DisplayLink;

pub struct FrameWriter<L: DisplayLink> {
    link: L,
    encoder: Encoder,
    stats: Arc<PipelineStats>,
}

impl<L: DisplayLink> FrameWriter<L> {
    pub fn new(link: L, encoder: Encoder, stats: Arc<PipelineStats>) -> Self {
        Self {
            link,
            encoder,
            stats,
        }
    }

    /// Encode and write one frame. Returns whether it reached the link.
    pub fn write(&mut self, frame: &BitFrame) -> bool {
        let Ok(bytes) = self.encoder.encode(frame) else {
            return false;
        };
        match self.link.write_frame(&bytes) {
            Ok(()) => {
                self.stats.record_written();
                true
            }
            Err(e) => {
                self.stats.record_write_failure();
                error!(link = %self.link.describe(), error = %e, "Frame dropped");
                false
            }
        }
    }

    /// Drain `frames` until every sender is dropped.
    pub fn run(mut self, mut frames: FrameReceiver) -> L {
        info!(link = %self.link.describe(), "Writer started");
        while let Some(frame) = frames.blocking_recv() {
            self.write(&frame);
        }
        debug!("Writer stopped");
        self.link
    }
}

impl<L: DisplayLink + 'static> FrameWriter<L> {
    /// Run on a new OS thread. Joining returns the link.
    pub fn spawn(self, frames: FrameReceiver) -> std::io::Result<JoinHandle<L>> {
        thread::Builder::new()
            .name("flipdot-writer".to_string())
            .spawn(move || self.run(frames))
    }
}
