//! # Frame Pipeline
//!
//! ```text
//! Producer ──► FrameSender ══ bounded channel ══► FrameReceiver ──► FrameWriter
//!  (tokio)        ▲                                               (OS thread)
//!                 └── WebSocket clients                 validate → split →
//!                                                       pack → frame → link
//! ```
//!
//! - [`producer`]: periodic render loop at the host frame rate
//! - [`channel`]: drop-newest bounded transport
//! - [`encoder`]: validation and device encoding
//! - [`writer`]: exclusive owner of the display link
//! - [`stats`]: shared counters

pub mod channel;
pub mod encoder;
pub mod producer;
pub mod stats;
pub mod writer;

pub use channel::{DEFAULT_DEPTH, FrameReceiver, FrameSender, SendOutcome, frame_channel};
pub use encoder::Encoder;
pub use producer::Producer;
pub use stats::{PipelineStats, StatsSnapshot};
pub use writer::FrameWriter;

use std::sync::Arc;
use std::thread::JoinHandle;

use crate::display::DisplayConfig;
use crate::error::FlipdotError;
use crate::transport::DisplayLink;

/// A running transport + writer pair.
pub struct Pipeline<L: DisplayLink> {
    pub sender: FrameSender,
    pub stats: Arc<PipelineStats>,
    writer: JoinHandle<L>,
}

impl<L: DisplayLink + 'static> Pipeline<L> {
    /// Spawn the writer thread for `link` behind a queue of `depth` frames.
    pub fn start(config: DisplayConfig, link: L, depth: usize) -> Result<Self, FlipdotError> {
        let stats = Arc::new(PipelineStats::new());
        let (sender, receiver) = frame_channel(depth, stats.clone());
        let writer = FrameWriter::new(link, Encoder::new(config, stats.clone()), stats.clone())
            .spawn(receiver)?;
        Ok(Self {
            sender,
            stats,
            writer,
        })
    }

    /// Close the transport, wait for the backlog to drain and return the link.
    pub fn finish(self) -> Result<L, FlipdotError> {
        drop(self.sender);
        self.writer
            .join()
            .map_err(|_| FlipdotError::Transport("writer thread panicked".to_string()))
    }
}
