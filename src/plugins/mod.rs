//! # Animation Plugins
//!
//! Interchangeable frame producers. Each plugin is a struct implementing the
//! [`Plugin`] trait and owns all of its animation state; the
//! [`PluginHost`](crate::host::PluginHost) builds a fresh instance on every load
//! and drops it on unload, so nothing survives a reload by accident.
//!
//! ## Capabilities
//!
//! - [`Plugin::render`]: draw the next frame into the shared canvas
//! - [`Plugin::on_pointer`]: optional pointer press/drag handling
//! - [`Plugin::controls`] / [`Plugin::set_control`]: declarative tunables a
//!   generic UI can render and drive
//!
//! ## Adding a New Plugin
//!
//! 1. Create `src/plugins/myplugin.rs` with a struct implementing [`Plugin`]
//! 2. Add `pub mod myplugin;` below
//! 3. Add it to [`PLUGINS`] and [`by_name`]

pub mod adjustable_dots;
pub mod bouncer;
pub mod dot_drawer;
pub mod fireworks;
pub mod heartbeat_monitor;
pub mod noise;
pub mod ripple_click;
pub mod scroll_text;
pub mod wave;

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::display::DisplayConfig;
use crate::render::Canvas;

/// Lowest frame rate the producer loop runs at.
pub const MIN_FRAME_RATE: u32 = 1;
/// Highest frame rate the producer loop runs at.
pub const MAX_FRAME_RATE: u32 = 60;
/// Frame rate a freshly started host uses.
pub const DEFAULT_FRAME_RATE: u32 = 30;

/// All available plugins, in display order.
pub const PLUGINS: &[&str] = &[
    "panel_test",
    "bouncer",
    "adjustable_dots",
    "dot_drawer",
    "noise",
    "wave",
    "ripple_click",
    "heartbeat_monitor",
    "scroll_text",
    "fireworks",
];

/// Build a fresh plugin instance by name (case-insensitive).
pub fn by_name(name: &str, config: &DisplayConfig) -> Option<Box<dyn Plugin>> {
    match name.to_lowercase().as_str() {
        "panel_test" => Some(Box::new(panel_test::PanelTest)),
        "bouncer" => Some(Box::new(bouncer::Bouncer::default())),
        "adjustable_dots" => Some(Box::new(adjustable_dots::AdjustableDots::default())),
        "dot_drawer" => Some(Box::new(dot_drawer::DotDrawer::default())),
        "noise" => Some(Box::new(noise::Noise::default())),
        "wave" => Some(Box::new(wave::Wave::new(config))),
        "ripple_click" => Some(Box::new(ripple_click::RippleClick::default())),
        "heartbeat_monitor" | "heartbeat" => {
            Some(Box::new(heartbeat_monitor::HeartbeatMonitor::new(config)))
        }
        "scroll_text" => Some(Box::new(scroll_text::ScrollText::default())),
        "fireworks" => Some(Box::new(fireworks::Fireworks::default())),
        _ => None,
    }
}

/// Timing state handed to every render call.
#[derive(Debug, Clone)]
pub struct FrameContext {
    /// Frames rendered since the plugin was loaded
    pub frame_count: u64,
    /// Time since the plugin was loaded
    pub elapsed: Duration,
    /// Grid width in dots
    pub cols: usize,
    /// Grid height in dots
    pub rows: usize,
    frame_rate: u32,
}

impl FrameContext {
    pub fn new(
        config: &DisplayConfig,
        frame_count: u64,
        elapsed: Duration,
        frame_rate: u32,
    ) -> Self {
        Self {
            frame_count,
            elapsed,
            cols: config.cols,
            rows: config.rows,
            frame_rate: clamp_frame_rate(frame_rate),
        }
    }

    pub fn frame_rate(&self) -> u32 {
        self.frame_rate
    }

    /// Request a new producer frame rate. Clamped to 1..=60.
    pub fn set_frame_rate(&mut self, fps: u32) {
        self.frame_rate = clamp_frame_rate(fps);
    }

    pub fn millis(&self) -> u64 {
        self.elapsed.as_millis() as u64
    }
}

/// Clamp a requested frame rate to the supported range.
pub fn clamp_frame_rate(fps: u32) -> u32 {
    fps.clamp(MIN_FRAME_RATE, MAX_FRAME_RATE)
}

/// Pointer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
}

/// Pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerKind {
    #[default]
    Press,
    Drag,
}

/// Pointer input in grid coordinates.
///
/// `x` and `y` are fractional cells: `(0.5, 0.5)` is the center of the top-left dot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub button: PointerButton,
    #[serde(default)]
    pub kind: PointerKind,
}

impl PointerEvent {
    pub fn press(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            button: PointerButton::Primary,
            kind: PointerKind::Press,
        }
    }

    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }

    pub fn with_kind(mut self, kind: PointerKind) -> Self {
        self.kind = kind;
        self
    }

    /// Grid cell under the pointer, if inside a `cols` x `rows` grid.
    pub fn cell(&self, cols: usize, rows: usize) -> Option<(usize, usize)> {
        if self.x < 0.0 || self.y < 0.0 {
            return None;
        }
        let (x, y) = (self.x.floor() as usize, self.y.floor() as usize);
        (x < cols && y < rows).then_some((x, y))
    }
}

/// A control value coming from or going to the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ControlValue {
    Bool(bool),
    Number(f64),
    Text(String),
    None,
}

impl ControlValue {
    /// Numeric value. NaN and infinities are rejected.
    pub fn as_f64(&self) -> Result<f64, String> {
        let n = match self {
            ControlValue::Number(n) => *n,
            ControlValue::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|e| format!("Invalid value '{}': {}", s, e))?,
            other => return Err(format!("Expected a number, got {:?}", other)),
        };
        if n.is_finite() {
            Ok(n)
        } else {
            Err(format!("{} must be a finite number", n))
        }
    }

    pub fn as_f32(&self) -> Result<f32, String> {
        self.as_f64().map(|v| v as f32)
    }

    pub fn as_bool(&self) -> Result<bool, String> {
        match self {
            ControlValue::Bool(b) => Ok(*b),
            ControlValue::Number(n) => Ok(*n != 0.0),
            ControlValue::Text(s) => match s.as_str() {
                "true" | "on" | "1" => Ok(true),
                "false" | "off" | "0" => Ok(false),
                _ => Err(format!("Invalid boolean '{}'", s)),
            },
            ControlValue::None => Err("Expected a boolean".to_string()),
        }
    }

    pub fn as_text(&self) -> Result<String, String> {
        match self {
            ControlValue::Text(s) => Ok(s.clone()),
            ControlValue::Number(n) => Ok(n.to_string()),
            ControlValue::Bool(b) => Ok(b.to_string()),
            ControlValue::None => Err("Expected text".to_string()),
        }
    }
}

impl From<f32> for ControlValue {
    fn from(v: f32) -> Self {
        // Round-trip through the shortest decimal so 0.05f32 shows as 0.05
        ControlValue::Number(v.to_string().parse().unwrap_or(v as f64))
    }
}

impl From<u32> for ControlValue {
    fn from(v: u32) -> Self {
        ControlValue::Number(v as f64)
    }
}

impl From<bool> for ControlValue {
    fn from(v: bool) -> Self {
        ControlValue::Bool(v)
    }
}

impl From<&str> for ControlValue {
    fn from(v: &str) -> Self {
        ControlValue::Text(v.to_string())
    }
}

impl From<String> for ControlValue {
    fn from(v: String) -> Self {
        ControlValue::Text(v)
    }
}

/// One entry of a select control.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// Control type and its bounds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ControlKind {
    Range { min: f64, max: f64, step: f64 },
    Checkbox,
    Select { options: Vec<SelectOption> },
    Button,
    Text,
    Display,
}

/// Declarative description of a plugin tunable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Control {
    pub key: &'static str,
    pub label: String,
    #[serde(flatten)]
    pub kind: ControlKind,
    pub value: ControlValue,
}

impl Control {
    pub fn range(
        key: &'static str,
        label: &str,
        min: f64,
        max: f64,
        step: f64,
        value: impl Into<ControlValue>,
    ) -> Self {
        Self {
            key,
            label: label.to_string(),
            kind: ControlKind::Range { min, max, step },
            value: value.into(),
        }
    }

    pub fn checkbox(key: &'static str, label: &str, value: bool) -> Self {
        Self {
            key,
            label: label.to_string(),
            kind: ControlKind::Checkbox,
            value: value.into(),
        }
    }

    /// Select from `(value, label)` pairs.
    pub fn select(key: &'static str, label: &str, options: &[(&str, &str)], value: &str) -> Self {
        Self {
            key,
            label: label.to_string(),
            kind: ControlKind::Select {
                options: options
                    .iter()
                    .map(|(v, l)| SelectOption {
                        value: v.to_string(),
                        label: l.to_string(),
                    })
                    .collect(),
            },
            value: value.into(),
        }
    }

    pub fn button(key: &'static str, label: impl Into<String>) -> Self {
        Self {
            key,
            label: label.into(),
            kind: ControlKind::Button,
            value: ControlValue::None,
        }
    }

    pub fn text(key: &'static str, label: &str, value: &str) -> Self {
        Self {
            key,
            label: label.to_string(),
            kind: ControlKind::Text,
            value: value.into(),
        }
    }

    /// Read-only value shown next to the other controls.
    pub fn display(key: &'static str, label: &str, value: impl Into<ControlValue>) -> Self {
        Self {
            key,
            label: label.to_string(),
            kind: ControlKind::Display,
            value: value.into(),
        }
    }

    /// Check `value` against this control's kind and bounds, returning the
    /// value the plugin should receive (numbers are clamped to range).
    pub fn coerce(&self, value: &ControlValue) -> Result<ControlValue, String> {
        match &self.kind {
            ControlKind::Range { min, max, .. } => {
                Ok(ControlValue::Number(value.as_f64()?.clamp(*min, *max)))
            }
            ControlKind::Checkbox => Ok(ControlValue::Bool(value.as_bool()?)),
            ControlKind::Select { options } => {
                let v = value.as_text()?;
                if options.iter().any(|o| o.value == v) {
                    Ok(ControlValue::Text(v))
                } else {
                    Err(format!("'{}' is not an option of {}", v, self.key))
                }
            }
            ControlKind::Button => Ok(ControlValue::None),
            ControlKind::Text => Ok(ControlValue::Text(value.as_text()?)),
            ControlKind::Display => Err(format!("{} is read-only", self.key)),
        }
    }
}

/// Trait for animation plugins.
pub trait Plugin: Send {
    /// Plugin identifier (lowercase, e.g., "wave").
    fn name(&self) -> &'static str;

    /// Draw the next frame. Called once per producer tick.
    fn render(&mut self, canvas: &mut Canvas, ctx: &mut FrameContext);

    /// Handle a pointer press or drag.
    fn on_pointer(&mut self, _event: &PointerEvent, _ctx: &FrameContext) {}

    /// Current tunables.
    fn controls(&self) -> Vec<Control> {
        Vec::new()
    }

    /// Apply a tunable. Values arrive already checked by [`Control::coerce`].
    fn set_control(&mut self, key: &str, _value: &ControlValue) -> Result<(), String> {
        Err(format!("Unknown control '{}' for {}", key, self.name()))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Helpers for driving plugins in unit tests.

    use super::*;
    use crate::frame::BitFrame;
    use crate::render::Sampler;

    pub const CONFIG: DisplayConfig = DisplayConfig::DUAL_28X14;

    /// Render `frames` ticks and return the sampled frame of the last one.
    pub fn run(plugin: &mut dyn Plugin, frames: u64) -> BitFrame {
        let mut canvas = Canvas::new(&CONFIG);
        let mut last = BitFrame::blank(&CONFIG);
        for i in 0..frames {
            plugin.render(&mut canvas, &mut ctx(i));
            last = Sampler::new(CONFIG).sample(&canvas).unwrap();
        }
        last
    }

    /// Context for frame `i` at 30 fps.
    pub fn ctx(i: u64) -> FrameContext {
        FrameContext::new(&CONFIG, i, Duration::from_millis(i * 33), 30)
    }

    /// Context at a given wall-clock offset.
    pub fn at_ms(ms: u64) -> FrameContext {
        FrameContext::new(&CONFIG, 0, Duration::from_millis(ms), 30)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_listed_plugin_builds() {
        let config = DisplayConfig::DUAL_28X14;
        for name in PLUGINS {
            let plugin = by_name(name, &config).expect(name);
            assert_eq!(plugin.name(), *name);
        }
        assert!(by_name("WAVE", &config).is_some());
        assert!(by_name("missing", &config).is_none());
    }

    #[test]
    fn test_control_keys_are_unique() {
        let config = DisplayConfig::DUAL_28X14;
        for name in PLUGINS {
            let controls = by_name(name, &config).unwrap().controls();
            let mut keys: Vec<_> = controls.iter().map(|c| c.key).collect();
            keys.sort();
            keys.dedup();
            assert_eq!(keys.len(), controls.len(), "{}", name);
        }
    }

    #[test]
    fn test_frame_rate_clamped() {
        let mut ctx = FrameContext::new(&DisplayConfig::DUAL_28X14, 0, Duration::ZERO, 0);
        assert_eq!(ctx.frame_rate(), 1);
        ctx.set_frame_rate(500);
        assert_eq!(ctx.frame_rate(), 60);
    }

    #[test]
    fn test_pointer_cell() {
        assert_eq!(PointerEvent::press(0.5, 0.5).cell(28, 14), Some((0, 0)));
        assert_eq!(PointerEvent::press(27.9, 13.9).cell(28, 14), Some((27, 13)));
        assert_eq!(PointerEvent::press(28.0, 0.0).cell(28, 14), None);
        assert_eq!(PointerEvent::press(-0.1, 0.0).cell(28, 14), None);
    }

    #[test]
    fn test_pointer_event_json_defaults() {
        let ev: PointerEvent = serde_json::from_str(r#"{"x": 1.5, "y": 2.0}"#).unwrap();
        assert_eq!(ev.button, PointerButton::Primary);
        assert_eq!(ev.kind, PointerKind::Press);
        let ev: PointerEvent =
            serde_json::from_str(r#"{"x": 1, "y": 2, "button": "secondary", "kind": "drag"}"#)
                .unwrap();
        assert_eq!(ev.button, PointerButton::Secondary);
        assert_eq!(ev.kind, PointerKind::Drag);
    }

    #[test]
    fn test_control_value_json() {
        let v: ControlValue = serde_json::from_str("0.25").unwrap();
        assert_eq!(v, ControlValue::Number(0.25));
        let v: ControlValue = serde_json::from_str("true").unwrap();
        assert_eq!(v, ControlValue::Bool(true));
        let v: ControlValue = serde_json::from_str("\"rtl\"").unwrap();
        assert_eq!(v, ControlValue::Text("rtl".to_string()));
        let v: ControlValue = serde_json::from_str("null").unwrap();
        assert_eq!(v, ControlValue::None);
    }

    #[test]
    fn test_coerce_range_clamps() {
        let c = Control::range("speed", "Speed", 0.0, 1.0, 0.1, 0.5f32);
        assert_eq!(c.coerce(&ControlValue::Number(3.0)), Ok(ControlValue::Number(1.0)));
        assert_eq!(
            c.coerce(&ControlValue::Text("0.25".into())),
            Ok(ControlValue::Number(0.25))
        );
        assert!(c.coerce(&ControlValue::Bool(true)).is_err());
    }

    #[test]
    fn test_coerce_range_rejects_non_finite() {
        let c = Control::range("speed", "Speed", 0.05, 5.0, 0.05, 0.4f32);
        for text in ["NaN", "nan", "inf", "-inf", "infinity"] {
            assert!(c.coerce(&ControlValue::Text(text.into())).is_err(), "{}", text);
        }
        assert!(c.coerce(&ControlValue::Number(f64::NAN)).is_err());
        assert!(c.coerce(&ControlValue::Number(f64::INFINITY)).is_err());
    }

    #[test]
    fn test_coerce_select_checks_options() {
        let c = Control::select(
            "dir",
            "Direction",
            &[("rtl", "Right to left"), ("ltr", "Left to right")],
            "rtl",
        );
        assert!(c.coerce(&"ltr".into()).is_ok());
        assert!(c.coerce(&"up".into()).is_err());
    }

    #[test]
    fn test_coerce_display_is_read_only() {
        let c = Control::display("count", "Count", 3u32);
        assert!(c.coerce(&ControlValue::Number(1.0)).is_err());
    }

    #[test]
    fn test_control_serializes_flat() {
        let c = Control::range("speed", "Speed", 0.0, 1.0, 0.1, 0.5f32);
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["kind"], "range");
        assert_eq!(json["key"], "speed");
        assert_eq!(json["min"], 0.0);
        assert_eq!(json["value"], 0.5);
    }
}
