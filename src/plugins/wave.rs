//! # Wave
//!
//! A sine wave of dots scrolling across the grid.
//!
//! - Primary press: amplitude pulse (1.5x) for a few frames
//! - Secondary press: reverse direction
//! - Pointer position: local wobble within `radius` columns (interactive mode)

use super::{Control, ControlValue, FrameContext, Plugin, PointerButton, PointerEvent, PointerKind};
use crate::display::DisplayConfig;
use crate::render::Canvas;
use crate::render::canvas::{INK, PAPER};

const PULSE_FRAMES: u64 = 5;
const PULSE_GAIN: f32 = 1.5;
const WOBBLE_RATE: f32 = 0.4;

#[derive(Debug)]
pub struct Wave {
    speed: f32,
    /// Amplitude in rows
    height: f32,
    frequency: f32,
    dot_scale: f32,
    interactive: bool,
    influence: f32,
    radius: f32,
    /// Dots per wave across the grid width
    density: f32,
    max_height: f32,
    cols: f32,
    last_press: Option<u64>,
    pointer: Option<(f32, f32)>,
}

impl Wave {
    pub fn new(config: &DisplayConfig) -> Self {
        Self {
            speed: 0.05,
            height: config.rows as f32 / 3.0,
            frequency: 0.5,
            dot_scale: 1.0,
            interactive: true,
            influence: 2.0,
            radius: 5.0,
            density: config.cols as f32,
            max_height: (config.rows / 2) as f32,
            cols: config.cols as f32,
            last_press: None,
            pointer: None,
        }
    }

    /// Row position of the wave at column `x`.
    fn row_at(&self, x: f32, frame: u64, rows: f32) -> f32 {
        let f = frame as f32;
        let boosted = self
            .last_press
            .is_some_and(|p| frame.saturating_sub(p) < PULSE_FRAMES);
        let amplitude = if boosted { self.height * PULSE_GAIN } else { self.height };
        let mut y = rows / 2.0 + (x * self.frequency + f * self.speed).sin() * amplitude;

        if self.interactive {
            if let Some((px, _)) = self.pointer {
                let dx = (px.floor() - x).abs();
                if dx < self.radius {
                    let strength = (self.radius - dx) / self.radius;
                    y += (f * WOBBLE_RATE).sin() * self.height * strength * self.influence;
                }
            }
        }
        y
    }
}

impl Plugin for Wave {
    fn name(&self) -> &'static str {
        "wave"
    }

    fn render(&mut self, canvas: &mut Canvas, ctx: &mut FrameContext) {
        canvas.background(PAPER);
        let dot = canvas.dot_size() as f32;
        let cols = canvas.cols() as f32;
        let rows = canvas.rows() as f32;
        let step = (cols / self.density).max(1.0);

        let mut x = 0.0;
        while x < cols {
            let y = self.row_at(x, ctx.frame_count, rows);
            canvas.fill_circle(x * dot + dot / 2.0, y * dot + dot / 2.0, dot * self.dot_scale, INK);
            x += step;
        }
    }

    fn on_pointer(&mut self, event: &PointerEvent, ctx: &FrameContext) {
        let inside = event.cell(ctx.cols, ctx.rows).is_some();
        self.pointer = inside.then_some((event.x, event.y));
        if event.kind != PointerKind::Press {
            return;
        }
        match event.button {
            PointerButton::Primary => self.last_press = Some(ctx.frame_count),
            PointerButton::Secondary => self.speed = -self.speed,
        }
    }

    fn controls(&self) -> Vec<Control> {
        vec![
            Control::range("speed", "Wave Speed", -0.5, 0.5, 0.01, self.speed),
            Control::range("height", "Wave Height", 1.0, self.max_height as f64, 1.0, self.height),
            Control::range("frequency", "Wave Frequency", 0.1, 3.0, 0.1, self.frequency),
            Control::range("dot_scale", "Dot Size", 0.1, 1.5, 0.05, self.dot_scale),
            Control::checkbox("interactive", "Interactive Mode", self.interactive),
            Control::range("influence", "Pointer Influence", 0.0, 5.0, 0.1, self.influence),
            Control::range("radius", "Pointer Radius", 1.0, 10.0, 1.0, self.radius),
            Control::range("density", "Wave Density", 2.0, self.cols as f64, 1.0, self.density),
        ]
    }

    fn set_control(&mut self, key: &str, value: &ControlValue) -> Result<(), String> {
        match key {
            "interactive" => self.interactive = value.as_bool()?,
            "speed" => self.speed = value.as_f32()?,
            "height" => self.height = value.as_f32()?,
            "frequency" => self.frequency = value.as_f32()?,
            "dot_scale" => self.dot_scale = value.as_f32()?,
            "influence" => self.influence = value.as_f32()?,
            "radius" => self.radius = value.as_f32()?,
            "density" => self.density = value.as_f32()?.max(1.0),
            _ => return Err(format!("Unknown control '{}' for wave", key)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::testing::{CONFIG, ctx, run};

    #[test]
    fn test_at_most_one_dot_per_column() {
        let frame = run(&mut Wave::new(&CONFIG), 1);
        for x in 0..28 {
            let lit = (0..14).filter(|&y| frame.get(x, y)).count();
            assert!(lit <= 1, "column {} has {} dots", x, lit);
        }
        assert!(frame.count_on() >= 20);
    }

    #[test]
    fn test_primary_press_pulses_amplitude() {
        let mut plain = Wave::new(&CONFIG);
        let mut pulsed = Wave::new(&CONFIG);
        pulsed.on_pointer(&PointerEvent::press(-1.0, -1.0), &ctx(0));
        assert!(pulsed.row_at(3.0, 1, 14.0) > plain.row_at(3.0, 1, 14.0));
        // Pulse is over after five frames
        assert_eq!(pulsed.row_at(3.0, 6, 14.0), plain.row_at(3.0, 6, 14.0));
        assert_ne!(run(&mut plain, 2), run(&mut pulsed, 2));
    }

    #[test]
    fn test_secondary_press_reverses() {
        let mut wave = Wave::new(&CONFIG);
        wave.on_pointer(
            &PointerEvent::press(2.0, 2.0).with_button(PointerButton::Secondary),
            &ctx(0),
        );
        assert_eq!(wave.controls()[0].value, ControlValue::from(-0.05f32));
    }

    #[test]
    fn test_pointer_ignored_when_not_interactive() {
        let mut wave = Wave::new(&CONFIG);
        wave.set_control("interactive", &ControlValue::Bool(false)).unwrap();
        wave.on_pointer(
            &PointerEvent::press(3.0, 7.0).with_kind(PointerKind::Drag),
            &ctx(0),
        );
        let still = Wave::new(&CONFIG);
        assert_eq!(wave.row_at(3.0, 4, 14.0), still.row_at(3.0, 4, 14.0));
    }
}
