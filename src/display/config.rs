//! # Display Configuration
//!
//! This module defines the geometry of the supported flip-dot display.
//!
//! ## Supported Displays
//!
//! | Model | Grid | Panels | Baud |
//! |-------|------|--------|------|
//! | Dual 28x7 | 28 x 14 | 2 (top/bottom) | 57600 |
//!
//! ## Usage
//!
//! ```
//! use flipdot::display::DisplayConfig;
//!
//! let config = DisplayConfig::DUAL_28X14;
//! assert_eq!(config.cells(), 392);
//! assert_eq!(config.panel_cells(), 196);
//! ```

use serde::Serialize;

/// # Display Configuration
///
/// Defines the addressable grid of a dual-panel flip-dot display and the
/// raster scale animations are rendered at.
///
/// ## Geometry
///
/// ```text
///        col 0                              col 27
///       ┌──────────────────────────────────────┐
/// row 0 │            top panel (id 0)          │
///  ...  │                                      │
/// row 6 │                                      │
///       ├──────────────────────────────────────┤
/// row 7 │          bottom panel (id 1)         │
///  ...  │                                      │
/// row 13│                                      │
///       └──────────────────────────────────────┘
/// ```
///
/// ## Render Scale
///
/// Animations draw into a raster of `cols * dot_size` by `rows * dot_size`
/// pixels. The sampler reads one pixel per cell at `(sample_offset,
/// sample_offset)` inside the cell's square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplayConfig {
    /// Display model name
    pub name: &'static str,

    /// Grid width in dots
    pub cols: usize,

    /// Grid height in dots (always even: two equal panels)
    pub rows: usize,

    /// Raster pixels per dot edge
    pub dot_size: u32,

    /// Pixel offset of the sampled point inside each cell
    pub sample_offset: u32,

    /// Serial baud rate the controller expects
    pub baud_rate: u32,
}

impl DisplayConfig {
    /// # Dual 28x7 Panel Configuration
    ///
    /// Two 28x7 panels stacked vertically behind one RS-485 adapter.
    pub const DUAL_28X14: Self = Self {
        name: "Dual 28x7 flip-dot",
        cols: 28,
        rows: 14,
        dot_size: 20,
        sample_offset: 5,
        baud_rate: 57600,
    };

    /// Total number of dots (bit-frame length)
    #[inline]
    pub const fn cells(&self) -> usize {
        self.cols * self.rows
    }

    /// Rows per panel
    #[inline]
    pub const fn panel_rows(&self) -> usize {
        self.rows / 2
    }

    /// Dots per panel (panel bit-sequence length)
    #[inline]
    pub const fn panel_cells(&self) -> usize {
        self.cols * self.panel_rows()
    }

    /// Packed payload size of one panel in bytes
    #[inline]
    pub const fn panel_bytes(&self) -> usize {
        self.panel_cells().div_ceil(8)
    }

    /// Raster width in pixels
    #[inline]
    pub const fn width_px(&self) -> u32 {
        self.cols as u32 * self.dot_size
    }

    /// Raster height in pixels
    #[inline]
    pub const fn height_px(&self) -> u32 {
        self.rows as u32 * self.dot_size
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self::DUAL_28X14
    }
}

// Panels must split the grid evenly and the sampled point must land inside a cell.
const _: () = assert!(DisplayConfig::DUAL_28X14.rows % 2 == 0);
const _: () = assert!(DisplayConfig::DUAL_28X14.sample_offset < DisplayConfig::DUAL_28X14.dot_size);
