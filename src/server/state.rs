//! Server state and configuration.

use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;

use crate::display::DisplayConfig;
use crate::host::PluginHost;
use crate::pipeline::{FrameSender, PipelineStats};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:3000")
    pub listen_addr: String,
    /// Serial device path (e.g., "/dev/ttyUSB0")
    pub device_path: String,
    /// Display geometry and baud rate
    pub display: DisplayConfig,
    /// Plugin to load at startup
    pub plugin: Option<String>,
    /// Initial producer frame rate
    pub frame_rate: u32,
    /// Transport queue depth
    pub queue_depth: usize,
    /// Log frames instead of opening the serial device
    pub dry_run: bool,
}

/// Application state shared across handlers.
pub struct AppState {
    pub display: DisplayConfig,
    /// Where frames go, for the status endpoint
    pub link: String,
    pub host: Arc<Mutex<PluginHost>>,
    pub frames: FrameSender,
    pub stats: Arc<PipelineStats>,
    /// Unix timestamp of server boot for cache busting.
    pub boot_time: u64,
    pub started: Instant,
}

impl AppState {
    pub fn new(
        display: DisplayConfig,
        link: String,
        host: Arc<Mutex<PluginHost>>,
        frames: FrameSender,
    ) -> Self {
        let boot_time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        Self {
            stats: frames.stats().clone(),
            display,
            link,
            host,
            frames,
            boot_time,
            started: Instant::now(),
        }
    }
}
