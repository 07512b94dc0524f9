//! # Scroll Text
//!
//! A message marquee in Spleen bitmap text, one font pixel per dot.
//! A press restarts the message from its entry edge.

use tracing::warn;

use super::{Control, ControlValue, FrameContext, Plugin, PointerEvent, PointerKind};
use crate::render::Canvas;
use crate::render::canvas::{INK, PAPER};
use crate::render::font::{Face, TextMask, render_line};

pub const DEFAULT_MESSAGE: &str = "The quick brown fox jumps over the lazy dog.";
const FALLBACK_MESSAGE: &str = "HELLO FLIPDOT!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    RightToLeft,
    LeftToRight,
}

impl Direction {
    fn key(self) -> &'static str {
        match self {
            Direction::RightToLeft => "rtl",
            Direction::LeftToRight => "ltr",
        }
    }
}

#[derive(Debug)]
pub struct ScrollText {
    message: String,
    face: Face,
    /// Cells per frame
    speed: f32,
    direction: Direction,
    /// Rows relative to vertically centered
    offset: i32,
    /// Left edge of the text in cells; `None` until the first frame
    x: Option<f32>,
    mask: Option<TextMask>,
}

impl Default for ScrollText {
    fn default() -> Self {
        Self {
            message: DEFAULT_MESSAGE.to_string(),
            face: Face::Small,
            speed: 0.4,
            direction: Direction::RightToLeft,
            offset: 0,
            x: None,
            mask: None,
        }
    }
}

impl ScrollText {
    fn mask(&mut self) -> Option<&TextMask> {
        if self.mask.is_none() {
            match render_line(&self.message, self.face) {
                Ok(mask) => self.mask = Some(mask),
                Err(e) => warn!(error = %e, "scroll_text: text render failed"),
            }
        }
        self.mask.as_ref()
    }

    fn restart(&mut self) {
        self.x = None;
    }
}

impl Plugin for ScrollText {
    fn name(&self) -> &'static str {
        "scroll_text"
    }

    fn render(&mut self, canvas: &mut Canvas, _ctx: &mut FrameContext) {
        canvas.background(PAPER);
        let cols = canvas.cols();
        if self.mask().is_none() {
            return;
        }
        let Some(mask) = self.mask.as_ref() else {
            return;
        };

        let width = mask.width as f32;
        let x = *self.x.get_or_insert(match self.direction {
            Direction::RightToLeft => cols as f32,
            Direction::LeftToRight => -width,
        });
        let y = (canvas.rows() as i32 - mask.height as i32) / 2 + self.offset;
        canvas.blit_cells(&mask.bits, mask.width, x.round() as i32, y, INK);

        let next = match self.direction {
            Direction::RightToLeft if x - self.speed < -width => cols as f32,
            Direction::RightToLeft => x - self.speed,
            Direction::LeftToRight if x + self.speed > cols as f32 => -width,
            Direction::LeftToRight => x + self.speed,
        };
        self.x = Some(next);
    }

    fn on_pointer(&mut self, event: &PointerEvent, _ctx: &FrameContext) {
        if event.kind == PointerKind::Press {
            self.restart();
        }
    }

    fn controls(&self) -> Vec<Control> {
        vec![
            Control::text("message", "Message", &self.message),
            Control::select(
                "face",
                "Font",
                &[("small", "Spleen 6x12"), ("large", "Spleen 8x16")],
                self.face.name(),
            ),
            Control::range("speed", "Scroll Speed", 0.05, 5.0, 0.05, self.speed),
            Control::select(
                "direction",
                "Direction",
                &[("rtl", "Right to Left"), ("ltr", "Left to Right")],
                self.direction.key(),
            ),
            Control::range("offset", "Vertical Offset", -7.0, 7.0, 1.0, self.offset as f32),
        ]
    }

    fn set_control(&mut self, key: &str, value: &ControlValue) -> Result<(), String> {
        match key {
            "message" => {
                let text = value.as_text()?;
                self.message = if text.trim().is_empty() {
                    FALLBACK_MESSAGE.to_string()
                } else {
                    text
                };
                self.mask = None;
                self.restart();
            }
            "face" => {
                let name = value.as_text()?;
                self.face = Face::from_name(&name).ok_or(format!("Unknown font '{}'", name))?;
                self.mask = None;
                self.restart();
            }
            "direction" => {
                self.direction = match value.as_text()?.as_str() {
                    "rtl" => Direction::RightToLeft,
                    "ltr" => Direction::LeftToRight,
                    other => return Err(format!("Unknown direction '{}'", other)),
                };
                self.restart();
            }
            "speed" => self.speed = value.as_f32()?,
            "offset" => self.offset = value.as_f64()?.round() as i32,
            _ => return Err(format!("Unknown control '{}' for scroll_text", key)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::testing::{ctx, run};

    fn lit_columns(frame: &crate::frame::BitFrame) -> Vec<usize> {
        (0..frame.cols())
            .filter(|&x| (0..frame.rows()).any(|y| frame.get(x, y)))
            .collect()
    }

    fn fast(text: &str) -> ScrollText {
        let mut scroll = ScrollText::default();
        scroll.set_control("message", &text.into()).unwrap();
        scroll.set_control("speed", &ControlValue::Number(1.0)).unwrap();
        scroll
    }

    #[test]
    fn test_enters_from_the_right() {
        let mut scroll = fast("HI");
        assert_eq!(run(&mut scroll, 1).count_on(), 0);

        // Fifth frame draws at column 24
        let frame = run(&mut fast("HI"), 5);
        let cols = lit_columns(&frame);
        assert!(!cols.is_empty());
        assert!(cols.iter().all(|&x| x >= 24));
    }

    #[test]
    fn test_left_to_right_enters_from_the_left() {
        let mut scroll = fast("HI");
        scroll.set_control("direction", &"ltr".into()).unwrap();
        // Text is 12 wide, starts at -12, reaches -8 on the fifth frame
        let frame = run(&mut scroll, 5);
        let cols = lit_columns(&frame);
        assert!(!cols.is_empty());
        assert!(cols.iter().all(|&x| x < 4));
    }

    #[test]
    fn test_wraps_after_leaving() {
        let mut scroll = fast("HI");
        // 28 + 12 cells of travel, then back at the right edge
        let frame = run(&mut scroll, 42);
        assert_eq!(frame.count_on(), 0);
    }

    #[test]
    fn test_press_restarts() {
        let mut scroll = fast("HI");
        run(&mut scroll, 10);
        scroll.on_pointer(&PointerEvent::press(1.0, 1.0), &ctx(10));
        assert_eq!(run(&mut scroll, 1).count_on(), 0);
    }

    #[test]
    fn test_empty_message_falls_back() {
        let mut scroll = ScrollText::default();
        scroll.set_control("message", &"   ".into()).unwrap();
        assert_eq!(scroll.controls()[0].value, ControlValue::Text(FALLBACK_MESSAGE.into()));
    }

    #[test]
    fn test_rejects_unknown_direction() {
        let mut scroll = ScrollText::default();
        assert!(scroll.set_control("direction", &"up".into()).is_err());
    }
}
