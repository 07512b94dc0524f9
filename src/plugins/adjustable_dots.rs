//! # Adjustable Dots
//!
//! A row of evenly spaced dots across the vertical middle. Count and radius
//! are tunable; radius is in canvas pixels.

use super::{Control, ControlValue, FrameContext, Plugin};
use crate::render::Canvas;
use crate::render::canvas::{INK, PAPER};

#[derive(Debug)]
pub struct AdjustableDots {
    count: u32,
    radius: f32,
}

impl Default for AdjustableDots {
    fn default() -> Self {
        Self {
            count: 25,
            radius: 4.0,
        }
    }
}

impl Plugin for AdjustableDots {
    fn name(&self) -> &'static str {
        "adjustable_dots"
    }

    fn render(&mut self, canvas: &mut Canvas, _ctx: &mut FrameContext) {
        canvas.background(PAPER);
        let spacing = canvas.width() as f32 / (self.count + 1) as f32;
        let cy = canvas.height() as f32 / 2.0;
        for i in 1..=self.count {
            canvas.fill_circle(i as f32 * spacing, cy, self.radius * 2.0, INK);
        }
    }

    fn controls(&self) -> Vec<Control> {
        vec![
            Control::range("count", "Dot Count", 1.0, 100.0, 1.0, self.count),
            Control::range("radius", "Dot Size", 1.0, 10.0, 1.0, self.radius),
        ]
    }

    fn set_control(&mut self, key: &str, value: &ControlValue) -> Result<(), String> {
        match key {
            "count" => self.count = value.as_f64()?.round() as u32,
            "radius" => self.radius = value.as_f32()?,
            _ => return Err(format!("Unknown control '{}' for adjustable_dots", key)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::testing::run;

    #[test]
    fn test_small_dots_miss_sample_points() {
        // 8px dots centered on the panel seam never reach a sample pixel
        let frame = run(&mut AdjustableDots::default(), 1);
        assert_eq!(frame.count_on(), 0);
    }

    #[test]
    fn test_large_dots_light_the_seam_row() {
        let mut dots = AdjustableDots::default();
        dots.set_control("radius", &ControlValue::Number(10.0)).unwrap();
        dots.set_control("count", &ControlValue::Number(27.0)).unwrap();
        let frame = run(&mut dots, 1);
        // 20px spacing puts a dot on every column boundary
        assert!(frame.count_on() > 0);
        assert!((0..28).all(|x| !frame.get(x, 0)));
    }
}
