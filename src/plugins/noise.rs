//! # Noise Field
//!
//! Thresholded 3D value noise drifting over time. The pointer pushes the
//! sampled noise coordinates away from itself, so the field bends around it.
//!
//! ```text
//! t      = frame * 0.006
//! (nx,ny) = (x, y) * scale + repel offset
//! dot on  = fbm(nx, ny, t) > threshold
//! ```

use super::{Control, ControlValue, FrameContext, Plugin, PointerEvent};
use crate::render::Canvas;
use crate::render::canvas::{INK, PAPER};
use crate::shader::{dist, fbm3d};

const TIME_STEP: f32 = 0.006;
const DOT_SCALE: f32 = 0.7;
const OCTAVES: usize = 4;
const SEED: u32 = 0x5eed;

#[derive(Debug)]
pub struct Noise {
    scale: f32,
    threshold: f32,
    /// Repel radius in canvas pixels
    repel_radius: f32,
    repel_amount: f32,
    /// Last pointer position in grid cells
    pointer: Option<(f32, f32)>,
}

impl Default for Noise {
    fn default() -> Self {
        Self {
            scale: 0.05,
            threshold: 0.5,
            repel_radius: 100.0,
            repel_amount: 0.5,
            pointer: None,
        }
    }
}

impl Noise {
    fn coords(&self, x: f32, y: f32, cx: f32, cy: f32, dot: f32) -> (f32, f32) {
        let mut nx = x * self.scale;
        let mut ny = y * self.scale;
        if let Some((px, py)) = self.pointer {
            let (mx, my) = (px * dot, py * dot);
            let d = dist(cx, cy, mx, my);
            if d < self.repel_radius {
                let strength = (1.0 - d / self.repel_radius) * self.repel_amount;
                nx += (cx - mx) * strength * self.scale;
                ny += (cy - my) * strength * self.scale;
            }
        }
        (nx, ny)
    }
}

impl Plugin for Noise {
    fn name(&self) -> &'static str {
        "noise"
    }

    fn render(&mut self, canvas: &mut Canvas, ctx: &mut FrameContext) {
        canvas.background(PAPER);
        let t = ctx.frame_count as f32 * TIME_STEP;
        let dot = canvas.dot_size() as f32;

        for y in 0..canvas.rows() {
            for x in 0..canvas.cols() {
                let (cx, cy) = canvas.cell_center(x as f32, y as f32);
                let (nx, ny) = self.coords(x as f32, y as f32, cx, cy, dot);
                if fbm3d(nx, ny, t, OCTAVES, SEED) > self.threshold {
                    canvas.fill_circle(cx, cy, dot * DOT_SCALE, INK);
                }
            }
        }
    }

    fn on_pointer(&mut self, event: &PointerEvent, _ctx: &FrameContext) {
        self.pointer = Some((event.x, event.y));
    }

    fn controls(&self) -> Vec<Control> {
        vec![
            Control::range("scale", "Noise Scale", 0.01, 0.3, 0.005, self.scale),
            Control::range("threshold", "Threshold", 0.0, 1.0, 0.01, self.threshold),
            Control::range("repel_radius", "Repel Radius", 0.0, 200.0, 1.0, self.repel_radius),
            Control::range("repel_amount", "Repel Amount", 0.0, 2.0, 0.05, self.repel_amount),
        ]
    }

    fn set_control(&mut self, key: &str, value: &ControlValue) -> Result<(), String> {
        let v = value.as_f32()?;
        match key {
            "scale" => self.scale = v,
            "threshold" => self.threshold = v,
            "repel_radius" => self.repel_radius = v,
            "repel_amount" => self.repel_amount = v,
            _ => return Err(format!("Unknown control '{}' for noise", key)),
        }
        Ok(())
    }
}
