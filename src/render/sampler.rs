//! # Raster Sampler
//!
//! Reduces a rendered [`Canvas`] to a [`BitFrame`] by reading one
//! representative pixel per grid cell.
//!
//! ## Sampling
//!
//! ```text
//! cell (x, y) spans pixels [x*dot, (x+1)*dot) x [y*dot, (y+1)*dot)
//! sampled pixel           = (x*dot + offset, y*dot + offset)
//! luma                    = (299 R + 587 G + 114 B) / 1000
//! dot on                  = luma < 128
//! ```
//!
//! The offset is fixed per display, so the same render always samples to the
//! same frame. The sampler only borrows the canvas immutably.

use image::Rgba;

use crate::display::DisplayConfig;
use crate::error::FlipdotError;
use crate::frame::BitFrame;

use super::canvas::Canvas;

/// Luma below this value turns a dot on.
pub const LUMA_THRESHOLD: u8 = 128;

/// Integer Rec.601 luma of an RGBA pixel (alpha ignored).
#[inline]
pub fn luma(pixel: Rgba<u8>) -> u8 {
    let [r, g, b, _] = pixel.0;
    ((299 * r as u32 + 587 * g as u32 + 114 * b as u32) / 1000) as u8
}

#[derive(Debug, Clone, Copy)]
pub struct Sampler {
    config: DisplayConfig,
}

impl Sampler {
    pub fn new(config: DisplayConfig) -> Self {
        debug_assert!(
            config.rows % 2 == 0,
            "display rows must split evenly into two panels, got {}",
            config.rows
        );
        Self { config }
    }

    /// Sample every cell of `canvas` into a row-major frame.
    pub fn sample(&self, canvas: &Canvas) -> Result<BitFrame, FlipdotError> {
        let c = &self.config;
        if canvas.width() < c.width_px() || canvas.height() < c.height_px() {
            return Err(FlipdotError::InvalidFrame(format!(
                "canvas {}x{} is smaller than the {}x{} raster",
                canvas.width(),
                canvas.height(),
                c.width_px(),
                c.height_px()
            )));
        }

        let mut bits = Vec::with_capacity(c.cells());
        for y in 0..c.rows as u32 {
            for x in 0..c.cols as u32 {
                let px = x * c.dot_size + c.sample_offset;
                let py = y * c.dot_size + c.sample_offset;
                let on = canvas
                    .pixel(px, py)
                    .is_some_and(|p| luma(p) < LUMA_THRESHOLD);
                bits.push(on);
            }
        }
        BitFrame::new(c, bits)
    }
}
