//! # Plugin Host
//!
//! Owns the active plugin and everything a render needs: the canvas, the
//! sampler, the frame counter and the frame rate.
//!
//! Only one plugin is live at a time. Loading tears the old one down first
//! (its state, pointer handlers and controls go with it), and a failed load
//! leaves the host empty so it produces no frames.

use serde::Serialize;
use std::time::Instant;
use tracing::{debug, error, info};

use crate::display::DisplayConfig;
use crate::error::FlipdotError;
use crate::frame::BitFrame;
use crate::plugins::{
    self, Control, ControlValue, DEFAULT_FRAME_RATE, FrameContext, MAX_FRAME_RATE, MIN_FRAME_RATE,
    Plugin, PointerEvent, clamp_frame_rate,
};
use crate::render::{Canvas, Sampler};

/// Host-level control appended to every plugin's list.
pub const FRAME_RATE_KEY: &str = "frame_rate";

/// Snapshot of the host for the API.
#[derive(Debug, Clone, Serialize)]
pub struct HostState {
    pub plugin: Option<&'static str>,
    pub frame_rate: u32,
    pub frame_count: u64,
    pub controls: Vec<Control>,
}

pub struct PluginHost {
    config: DisplayConfig,
    canvas: Canvas,
    sampler: Sampler,
    plugin: Option<Box<dyn Plugin>>,
    frame_count: u64,
    loaded_at: Instant,
    frame_rate: u32,
    last_frame: Option<BitFrame>,
}

impl PluginHost {
    pub fn new(config: DisplayConfig) -> Self {
        Self {
            canvas: Canvas::new(&config),
            sampler: Sampler::new(config),
            config,
            plugin: None,
            frame_count: 0,
            loaded_at: Instant::now(),
            frame_rate: DEFAULT_FRAME_RATE,
            last_frame: None,
        }
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// Name of the active plugin.
    pub fn current(&self) -> Option<&'static str> {
        self.plugin.as_ref().map(|p| p.name())
    }

    pub fn frame_rate(&self) -> u32 {
        self.frame_rate
    }

    pub fn set_frame_rate(&mut self, fps: u32) {
        self.frame_rate = clamp_frame_rate(fps);
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Most recent frame produced by [`tick`](Self::tick).
    pub fn last_frame(&self) -> Option<&BitFrame> {
        self.last_frame.as_ref()
    }

    /// Load a built-in plugin by name, replacing the active one.
    pub fn load(&mut self, name: &str) -> Result<&'static str, FlipdotError> {
        self.unload();
        match plugins::by_name(name, &self.config) {
            Some(plugin) => Ok(self.install(plugin)),
            None => {
                error!(plugin = name, "Unknown plugin, nothing loaded");
                Err(FlipdotError::Plugin(format!(
                    "Unknown plugin '{}'. Available: {}",
                    name,
                    plugins::PLUGINS.join(", ")
                )))
            }
        }
    }

    /// Install a plugin instance, replacing the active one.
    pub fn install(&mut self, plugin: Box<dyn Plugin>) -> &'static str {
        self.unload();
        let name = plugin.name();
        self.plugin = Some(plugin);
        info!(plugin = name, "Plugin loaded");
        name
    }

    /// Drop the active plugin and reset per-plugin state.
    pub fn unload(&mut self) {
        if let Some(old) = self.plugin.take() {
            info!(plugin = old.name(), "Plugin unloaded");
        }
        self.canvas = Canvas::new(&self.config);
        self.frame_count = 0;
        self.loaded_at = Instant::now();
        self.last_frame = None;
    }

    fn context(&self) -> FrameContext {
        FrameContext::new(
            &self.config,
            self.frame_count,
            self.loaded_at.elapsed(),
            self.frame_rate,
        )
    }

    /// Render and sample one frame. `None` when no plugin is loaded.
    pub fn tick(&mut self) -> Result<Option<BitFrame>, FlipdotError> {
        let mut ctx = self.context();
        let Some(plugin) = self.plugin.as_mut() else {
            return Ok(None);
        };
        plugin.render(&mut self.canvas, &mut ctx);
        self.frame_rate = ctx.frame_rate();
        self.frame_count += 1;

        let frame = self.sampler.sample(&self.canvas)?;
        self.last_frame = Some(frame.clone());
        Ok(Some(frame))
    }

    /// Forward a pointer event. Returns `false` when no plugin is loaded.
    pub fn pointer(&mut self, event: &PointerEvent) -> bool {
        let ctx = self.context();
        match self.plugin.as_mut() {
            Some(plugin) => {
                debug!(
                    x = event.x,
                    y = event.y,
                    button = ?event.button,
                    kind = ?event.kind,
                    "Pointer"
                );
                plugin.on_pointer(event, &ctx);
                true
            }
            None => false,
        }
    }

    /// The active plugin's controls followed by the host frame-rate control.
    pub fn controls(&self) -> Vec<Control> {
        let mut controls = self
            .plugin
            .as_ref()
            .map(|p| p.controls())
            .unwrap_or_default();
        if self.plugin.is_some() {
            controls.push(Control::range(
                FRAME_RATE_KEY,
                "Frame Rate",
                MIN_FRAME_RATE as f64,
                MAX_FRAME_RATE as f64,
                1.0,
                self.frame_rate,
            ));
        }
        controls
    }

    /// Apply a control value after checking it against the control's bounds.
    pub fn set_control(&mut self, key: &str, value: &ControlValue) -> Result<(), FlipdotError> {
        let control = self
            .controls()
            .into_iter()
            .find(|c| c.key == key)
            .ok_or_else(|| FlipdotError::Plugin(format!("Unknown control '{}'", key)))?;
        let value = control.coerce(value).map_err(FlipdotError::Plugin)?;

        if key == FRAME_RATE_KEY {
            let fps = value.as_f64().map_err(FlipdotError::Plugin)?;
            self.set_frame_rate(fps.round() as u32);
            info!(fps = self.frame_rate, "Frame rate changed");
            return Ok(());
        }

        let plugin = self
            .plugin
            .as_mut()
            .ok_or_else(|| FlipdotError::Plugin("No plugin loaded".to_string()))?;
        plugin.set_control(key, &value).map_err(FlipdotError::Plugin)?;
        debug!(plugin = plugin.name(), key, ?value, "Control set");
        Ok(())
    }

    pub fn state(&self) -> HostState {
        HostState {
            plugin: self.current(),
            frame_rate: self.frame_rate,
            frame_count: self.frame_count,
            controls: self.controls(),
        }
    }
}
