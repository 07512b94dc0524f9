//! # Rendering
//!
//! Plugins draw into a [`Canvas`]; the [`Sampler`] reduces it to a bit-frame.
//!
//! - [`canvas`]: RGBA drawing surface at `dot_size` pixels per dot
//! - [`sampler`]: Fixed-offset luminance sampling into a [`BitFrame`]
//! - [`font`]: Spleen bitmap text masks
//!
//! This module also renders frames back into PNG previews.

pub mod canvas;
pub mod font;
pub mod sampler;

pub use canvas::Canvas;
pub use sampler::Sampler;

use image::{GrayImage, Luma};
use std::io::Cursor;
use std::path::Path;

use crate::error::FlipdotError;
use crate::frame::BitFrame;

/// Draw a frame as round dots on a dark board, `scale` pixels per dot.
pub fn frame_image(frame: &BitFrame, scale: u32) -> GrayImage {
    let scale = scale.max(1);
    let mut img = GrayImage::from_pixel(
        frame.cols() as u32 * scale,
        frame.rows() as u32 * scale,
        Luma([32]),
    );
    let r = scale as f32 * 0.42;

    for gy in 0..frame.rows() {
        for gx in 0..frame.cols() {
            // Lit dots show their bright side
            let level = if frame.get(gx, gy) { 240u8 } else { 64u8 };
            let cx = gx as f32 * scale as f32 + scale as f32 / 2.0;
            let cy = gy as f32 * scale as f32 + scale as f32 / 2.0;
            for py in gy as u32 * scale..(gy as u32 + 1) * scale {
                for px in gx as u32 * scale..(gx as u32 + 1) * scale {
                    let dx = px as f32 + 0.5 - cx;
                    let dy = py as f32 + 0.5 - cy;
                    if dx * dx + dy * dy <= r * r {
                        img.put_pixel(px, py, Luma([level]));
                    }
                }
            }
        }
    }
    img
}

/// Encode a frame preview as PNG bytes.
pub fn frame_png(frame: &BitFrame, scale: u32) -> Result<Vec<u8>, FlipdotError> {
    let mut png_bytes = Vec::new();
    frame_image(frame, scale)
        .write_to(&mut Cursor::new(&mut png_bytes), image::ImageFormat::Png)
        .map_err(|e| FlipdotError::Image(format!("PNG encoding failed: {}", e)))?;
    Ok(png_bytes)
}

/// Save a frame preview as a PNG file.
pub fn save_frame_png(path: &Path, frame: &BitFrame, scale: u32) -> Result<(), FlipdotError> {
    frame_image(frame, scale)
        .save(path)
        .map_err(|e| FlipdotError::Image(format!("Failed to save PNG: {}", e)))
}
