//! # Dot Drawer
//!
//! Freehand drawing. Primary press/drag sets dots, secondary erases, and a
//! second primary press within [`DOUBLE_CLICK_MS`] clears the board.

use std::collections::BTreeSet;

use super::{Control, ControlValue, FrameContext, Plugin, PointerButton, PointerEvent};
use crate::render::Canvas;
use crate::render::canvas::{INK, PAPER};

pub const DOUBLE_CLICK_MS: u64 = 300;
const DOT_SCALE: f32 = 0.9;

#[derive(Debug, Default)]
pub struct DotDrawer {
    cells: BTreeSet<(usize, usize)>,
    last_press_ms: Option<u64>,
}

impl DotDrawer {
    pub fn lit(&self) -> usize {
        self.cells.len()
    }
}

impl Plugin for DotDrawer {
    fn name(&self) -> &'static str {
        "dot_drawer"
    }

    fn render(&mut self, canvas: &mut Canvas, _ctx: &mut FrameContext) {
        canvas.background(PAPER);
        for &(x, y) in &self.cells {
            canvas.dot(x as f32, y as f32, DOT_SCALE, INK);
        }
    }

    fn on_pointer(&mut self, event: &PointerEvent, ctx: &FrameContext) {
        use super::PointerKind::Press;

        if event.kind == Press && event.button == PointerButton::Primary {
            let now = ctx.millis();
            let double = self
                .last_press_ms
                .is_some_and(|t| now.saturating_sub(t) < DOUBLE_CLICK_MS);
            self.last_press_ms = Some(now);
            if double {
                self.cells.clear();
                return;
            }
        }

        let Some(cell) = event.cell(ctx.cols, ctx.rows) else {
            return;
        };
        match event.button {
            PointerButton::Primary => {
                self.cells.insert(cell);
            }
            PointerButton::Secondary => {
                self.cells.remove(&cell);
            }
        }
    }

    fn controls(&self) -> Vec<Control> {
        vec![Control::button("clear", "Clear Dots")]
    }

    fn set_control(&mut self, key: &str, _value: &ControlValue) -> Result<(), String> {
        match key {
            "clear" => {
                self.cells.clear();
                Ok(())
            }
            _ => Err(format!("Unknown control '{}' for dot_drawer", key)),
        }
    }
}
