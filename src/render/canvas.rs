//! Drawing surface plugins render into.
//!
//! The canvas is an RGBA raster at `dot_size` pixels per grid cell, the same
//! shape a browser sketch would draw into. Shapes are filled without
//! anti-aliasing: a pixel is painted when its center lies inside the shape.

use image::{Rgba, RgbaImage};

use crate::display::DisplayConfig;

/// Color of a lit dot.
pub const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Background color (dot off).
pub const PAPER: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Opaque gray level.
#[inline]
pub fn gray(level: u8) -> Rgba<u8> {
    Rgba([level, level, level, 255])
}

#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbaImage,
    cols: usize,
    rows: usize,
    dot_size: u32,
}

impl Canvas {
    /// Blank (white) canvas sized for `config`'s grid.
    pub fn new(config: &DisplayConfig) -> Self {
        Self {
            image: RgbaImage::from_pixel(config.width_px(), config.height_px(), PAPER),
            cols: config.cols,
            rows: config.rows,
            dot_size: config.dot_size,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn dot_size(&self) -> u32 {
        self.dot_size
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Pixel at `(x, y)`, or `None` outside the raster.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        (x < self.width() && y < self.height()).then(|| *self.image.get_pixel(x, y))
    }

    /// Pixel-space center of grid cell `(gx, gy)`.
    pub fn cell_center(&self, gx: f32, gy: f32) -> (f32, f32) {
        let d = self.dot_size as f32;
        (gx * d + d / 2.0, gy * d + d / 2.0)
    }

    /// Fill the whole raster.
    pub fn background(&mut self, color: Rgba<u8>) {
        for p in self.image.pixels_mut() {
            *p = color;
        }
    }

    /// Fill an axis-aligned rectangle in pixel space. Clipped to the raster.
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba<u8>) {
        let (x0, x1) = self.span(x, x + w, self.width());
        let (y0, y1) = self.span(y, y + h, self.height());
        for py in y0..y1 {
            for px in x0..x1 {
                self.image.put_pixel(px, py, color);
            }
        }
    }

    /// Fill an ellipse centered at `(cx, cy)` with diameters `w` x `h`.
    pub fn fill_ellipse(&mut self, cx: f32, cy: f32, w: f32, h: f32, color: Rgba<u8>) {
        let rx = w.abs() / 2.0;
        let ry = h.abs() / 2.0;
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }
        let (x0, x1) = self.span(cx - rx, cx + rx, self.width());
        let (y0, y1) = self.span(cy - ry, cy + ry, self.height());
        for py in y0..y1 {
            let dy = (py as f32 + 0.5 - cy) / ry;
            for px in x0..x1 {
                let dx = (px as f32 + 0.5 - cx) / rx;
                if dx * dx + dy * dy <= 1.0 {
                    self.image.put_pixel(px, py, color);
                }
            }
        }
    }

    /// Fill a circle of diameter `d`.
    pub fn fill_circle(&mut self, cx: f32, cy: f32, d: f32, color: Rgba<u8>) {
        self.fill_ellipse(cx, cy, d, d, color);
    }

    /// Draw a round dot of `scale * dot_size` diameter in grid cell `(gx, gy)`.
    pub fn dot(&mut self, gx: f32, gy: f32, scale: f32, color: Rgba<u8>) {
        let (cx, cy) = self.cell_center(gx, gy);
        self.fill_circle(cx, cy, self.dot_size as f32 * scale, color);
    }

    /// Fill a whole grid cell.
    pub fn fill_cell(&mut self, gx: i32, gy: i32, color: Rgba<u8>) {
        let d = self.dot_size as f32;
        self.fill_rect(gx as f32 * d, gy as f32 * d, d, d, color);
    }

    /// Copy a 1-bit mask onto the grid, one cell per mask pixel, with its
    /// top-left at cell `(gx, gy)`. Only set mask pixels are painted.
    pub fn blit_cells(
        &mut self,
        mask: &[bool],
        mask_width: usize,
        gx: i32,
        gy: i32,
        color: Rgba<u8>,
    ) {
        if mask_width == 0 {
            return;
        }
        for (i, _) in mask.iter().enumerate().filter(|(_, on)| **on) {
            let x = gx + (i % mask_width) as i32;
            let y = gy + (i / mask_width) as i32;
            if x >= 0 && y >= 0 && (x as usize) < self.cols && (y as usize) < self.rows {
                self.fill_cell(x, y, color);
            }
        }
    }

    /// Clip `[a, b)` to `[0, limit)` as pixel indices whose centers fall inside.
    fn span(&self, a: f32, b: f32, limit: u32) -> (u32, u32) {
        let start = (a - 0.5).ceil().max(0.0) as u32;
        let end = ((b - 0.5).ceil().max(0.0) as u32).min(limit);
        (start.min(end), end)
    }
}
