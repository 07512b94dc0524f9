//! # Heartbeat Monitor
//!
//! An ECG trace sweeping across the display. One beat lasts
//! `60 / bpm * frame_rate` frames; the spike sits 20% into the beat.
//!
//! ```text
//! beat[pos]     = baseline - spike
//! beat[pos + 1] = baseline + spike / 2
//! pos           = floor(len * 0.2)
//! ```

use super::{Control, ControlValue, FrameContext, Plugin};
use crate::display::DisplayConfig;
use crate::render::Canvas;
use crate::render::canvas::{INK, PAPER};

#[derive(Debug)]
pub struct HeartbeatMonitor {
    bpm: u32,
    spike: i32,
    baseline: i32,
    thickness: i32,
    sweep: usize,
    max_spike: i32,
    max_baseline: i32,
    scroll: usize,
    waveform: Vec<i32>,
    /// (bpm, spike, baseline, fps) the waveform was built for
    built_for: Option<(u32, i32, i32, u32)>,
}

impl HeartbeatMonitor {
    pub fn new(config: &DisplayConfig) -> Self {
        Self {
            bpm: 60,
            spike: 5,
            baseline: (config.rows / 2) as i32,
            thickness: 1,
            sweep: 1,
            max_spike: (config.rows / 2) as i32,
            max_baseline: config.rows as i32 - 1,
            scroll: 0,
            waveform: Vec::new(),
            built_for: None,
        }
    }

    /// One beat of row positions, one entry per frame.
    pub fn beat(bpm: u32, fps: u32, spike: i32, baseline: i32) -> Vec<i32> {
        let frames = ((60.0 / bpm.max(1) as f32) * fps as f32).floor() as usize;
        let mut wave = vec![baseline; frames.max(1)];
        let pos = (frames as f32 * 0.2).floor() as usize;
        if pos >= 1 && pos + 3 < wave.len() {
            wave[pos - 1] = baseline;
            wave[pos] = baseline - spike;
            wave[pos + 1] = baseline + spike / 2;
            wave[pos + 2] = baseline;
        }
        wave
    }

    fn rebuild_if_stale(&mut self, fps: u32) {
        let key = (self.bpm, self.spike, self.baseline, fps);
        if self.built_for != Some(key) {
            self.waveform = Self::beat(self.bpm, fps, self.spike, self.baseline);
            self.built_for = Some(key);
            if self.scroll >= self.waveform.len() {
                self.scroll = 0;
            }
        }
    }
}

impl Plugin for HeartbeatMonitor {
    fn name(&self) -> &'static str {
        "heartbeat_monitor"
    }

    fn render(&mut self, canvas: &mut Canvas, ctx: &mut FrameContext) {
        self.rebuild_if_stale(ctx.frame_rate());
        canvas.background(PAPER);

        self.scroll += self.sweep;
        if self.scroll >= self.waveform.len() {
            self.scroll = 0;
        }

        let rows = canvas.rows() as i32;
        for x in 0..canvas.cols() {
            let y = self.waveform[(self.scroll + x) % self.waveform.len()];
            for t in 0..self.thickness {
                if (0..rows).contains(&(y + t)) {
                    canvas.fill_cell(x as i32, y + t, INK);
                }
            }
        }
    }

    fn controls(&self) -> Vec<Control> {
        vec![
            Control::range("bpm", "BPM", 30.0, 180.0, 1.0, self.bpm),
            Control::range(
                "spike",
                "Spike Height",
                1.0,
                self.max_spike as f64,
                1.0,
                self.spike as u32,
            ),
            Control::range(
                "baseline",
                "Baseline Row",
                0.0,
                self.max_baseline as f64,
                1.0,
                self.baseline as u32,
            ),
            Control::range("thickness", "Line Thickness", 1.0, 3.0, 1.0, self.thickness as u32),
            Control::range("sweep", "Sweep Speed", 1.0, 5.0, 1.0, self.sweep as u32),
        ]
    }

    fn set_control(&mut self, key: &str, value: &ControlValue) -> Result<(), String> {
        let v = value.as_f64()?.round();
        match key {
            "bpm" => self.bpm = v as u32,
            "spike" => self.spike = v as i32,
            "baseline" => self.baseline = v as i32,
            "thickness" => self.thickness = v as i32,
            "sweep" => self.sweep = v as usize,
            _ => return Err(format!("Unknown control '{}' for heartbeat_monitor", key)),
        }
        Ok(())
    }
}
