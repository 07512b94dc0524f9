//! # Bouncer
//!
//! A single dot sweeping across the middle of the display, one column per
//! frame. With `trail` on the canvas is never cleared, so the sweep leaves a
//! solid line behind it.

use super::{Control, ControlValue, FrameContext, Plugin};
use crate::render::Canvas;
use crate::render::canvas::{INK, PAPER};

const DOT_SCALE: f32 = 0.9;

#[derive(Debug, Default)]
pub struct Bouncer {
    trail: bool,
}

impl Plugin for Bouncer {
    fn name(&self) -> &'static str {
        "bouncer"
    }

    fn render(&mut self, canvas: &mut Canvas, ctx: &mut FrameContext) {
        if !self.trail {
            canvas.background(PAPER);
        }
        let d = canvas.dot_size() as f32;
        let col = (ctx.frame_count % canvas.cols() as u64) as f32;
        let cy = canvas.height() as f32 / 2.0;
        canvas.fill_circle(col * d + d / 2.0, cy, d * DOT_SCALE, INK);
    }

    fn controls(&self) -> Vec<Control> {
        vec![Control::checkbox("trail", "Leave Trail", self.trail)]
    }

    fn set_control(&mut self, key: &str, value: &ControlValue) -> Result<(), String> {
        match key {
            "trail" => self.trail = value.as_bool()?,
            _ => return Err(format!("Unknown control '{}' for bouncer", key)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::testing::run;

    #[test]
    fn test_single_dot_tracks_frame_count() {
        // Frames 0..=4 were rendered, so the dot sits in column 4
        let frame = run(&mut Bouncer::default(), 5);
        assert_eq!(frame.count_on(), 1);
        assert!(frame.get(4, 7));
    }

    #[test]
    fn test_wraps_at_last_column() {
        let frame = run(&mut Bouncer::default(), 29);
        assert!(frame.get(0, 7));
        assert_eq!(frame.count_on(), 1);
    }

    #[test]
    fn test_trail_keeps_previous_dots() {
        let mut bouncer = Bouncer::default();
        bouncer.set_control("trail", &ControlValue::Bool(true)).unwrap();
        let frame = run(&mut bouncer, 3);
        assert_eq!(frame.count_on(), 3);
    }
}
