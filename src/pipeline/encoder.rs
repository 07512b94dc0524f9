//! Frame encoder: validate, split, pack, frame.

use std::sync::Arc;
use tracing::warn;

use super::stats::PipelineStats;
use crate::display::DisplayConfig;
use crate::error::FlipdotError;
use crate::frame::BitFrame;
use crate::protocol::{commands, panel};

/// Turns validated frames into one serial write each.
#[derive(Debug, Clone)]
pub struct Encoder {
    config: DisplayConfig,
    stats: Arc<PipelineStats>,
}

impl Encoder {
    /// `config.rows` must be even: each panel takes half the grid.
    pub fn new(config: DisplayConfig, stats: Arc<PipelineStats>) -> Self {
        debug_assert!(
            config.rows % 2 == 0,
            "display rows must split evenly into two panels, got {}",
            config.rows
        );
        Self { config, stats }
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// Encode `frame` into `[top command][bottom command]`.
    ///
    /// A frame that does not match the grid is counted as rejected and never
    /// reaches the splitter.
    pub fn encode(&self, frame: &BitFrame) -> Result<Vec<u8>, FlipdotError> {
        if let Err(e) = frame.validate(&self.config) {
            self.stats.record_rejected();
            warn!(error = %e, "Frame rejected");
            return Err(e);
        }

        let panels = panel::split(frame, &self.config);
        self.stats.record_split();

        let [top, bottom] = commands::panel_commands(&panels)?;
        Ok(commands::concat(&[top, bottom]))
    }
}
