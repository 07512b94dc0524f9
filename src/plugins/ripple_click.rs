//! # Ripple Click
//!
//! A press starts a ring expanding from the pointer. In rhythmic mode the ring
//! is banded by a sine of the distance; smooth mode draws the plain ring.

use super::{Control, ControlValue, FrameContext, Plugin, PointerEvent, PointerKind};
use crate::render::Canvas;
use crate::render::canvas::{INK, PAPER};
use crate::shader::dist;

#[derive(Debug, Clone, Copy)]
struct Ripple {
    /// Origin in grid cells
    x: f32,
    y: f32,
    start_frame: u64,
}

#[derive(Debug)]
pub struct RippleClick {
    /// Pixels per frame
    speed: f32,
    spacing: f32,
    /// Ring thickness in pixels
    width: f32,
    threshold: f32,
    dot_scale: f32,
    smooth: bool,
    ripple: Option<Ripple>,
}

impl Default for RippleClick {
    fn default() -> Self {
        Self {
            speed: 2.0,
            spacing: 0.2,
            width: 6.0,
            threshold: 0.3,
            dot_scale: 0.9,
            smooth: false,
            ripple: None,
        }
    }
}

impl Plugin for RippleClick {
    fn name(&self) -> &'static str {
        "ripple_click"
    }

    fn render(&mut self, canvas: &mut Canvas, ctx: &mut FrameContext) {
        canvas.background(PAPER);
        let Some(ripple) = self.ripple else {
            return;
        };

        let dot = canvas.dot_size() as f32;
        let (ox, oy) = (ripple.x * dot, ripple.y * dot);
        let t = ctx.frame_count.saturating_sub(ripple.start_frame) as f32 * self.speed;

        for y in 0..canvas.rows() {
            for x in 0..canvas.cols() {
                let (cx, cy) = canvas.cell_center(x as f32, y as f32);
                let d = dist(cx, cy, ox, oy);
                if (d - t).abs() >= self.width {
                    continue;
                }
                let banded = (d * self.spacing - t * 0.5).sin() > self.threshold;
                if self.smooth || banded {
                    canvas.fill_circle(cx, cy, dot * self.dot_scale, INK);
                }
            }
        }
    }

    fn on_pointer(&mut self, event: &PointerEvent, ctx: &FrameContext) {
        if event.kind == PointerKind::Press {
            self.ripple = Some(Ripple {
                x: event.x,
                y: event.y,
                start_frame: ctx.frame_count,
            });
        }
    }

    fn controls(&self) -> Vec<Control> {
        vec![
            Control::range("speed", "Ripple Speed", 0.5, 5.0, 0.1, self.speed),
            Control::range("spacing", "Wave Spacing", 0.05, 1.0, 0.01, self.spacing),
            Control::range("width", "Ripple Width", 1.0, 20.0, 1.0, self.width),
            Control::range("threshold", "Wave Threshold", 0.0, 1.0, 0.01, self.threshold),
            Control::range("dot_scale", "Dot Size", 0.1, 1.5, 0.05, self.dot_scale),
            Control::checkbox("smooth", "Smooth Ripples", self.smooth),
        ]
    }

    fn set_control(&mut self, key: &str, value: &ControlValue) -> Result<(), String> {
        match key {
            "smooth" => self.smooth = value.as_bool()?,
            "speed" => self.speed = value.as_f32()?,
            "spacing" => self.spacing = value.as_f32()?,
            "width" => self.width = value.as_f32()?,
            "threshold" => self.threshold = value.as_f32()?,
            "dot_scale" => self.dot_scale = value.as_f32()?,
            _ => return Err(format!("Unknown control '{}' for ripple_click", key)),
        }
        Ok(())
    }
}
