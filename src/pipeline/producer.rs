//! # Frame Producer
//!
//! The periodic loop that drives the active plugin. One iteration renders,
//! samples and hands off a frame before the next tick, so a producer never
//! has more than one frame in flight. The timer follows the host's frame rate
//! and is rebuilt whenever a control or plugin changes it.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{self, Interval, MissedTickBehavior};
use tracing::{debug, error, info};

use super::channel::FrameSender;
use crate::host::PluginHost;

pub struct Producer {
    host: Arc<Mutex<PluginHost>>,
    frames: FrameSender,
}

fn period(fps: u32) -> Duration {
    Duration::from_secs_f64(1.0 / fps.max(1) as f64)
}

fn ticker(fps: u32) -> Interval {
    let mut interval = time::interval(period(fps));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

impl Producer {
    pub fn new(host: Arc<Mutex<PluginHost>>, frames: FrameSender) -> Self {
        Self { host, frames }
    }

    /// Render one frame and hand it off. Returns the host frame rate after
    /// the render.
    pub async fn step(&self) -> u32 {
        let mut host = self.host.lock().await;
        match host.tick() {
            Ok(Some(frame)) => {
                self.frames.send(frame);
            }
            Ok(None) => {}
            Err(e) => error!(plugin = ?host.current(), error = %e, "Render failed, frame dropped"),
        }
        host.frame_rate()
    }

    /// Run until the writer side closes.
    pub async fn run(self) {
        let mut fps = self.host.lock().await.frame_rate();
        let mut interval = ticker(fps);
        info!(fps, "Producer started");

        while !self.frames.is_closed() {
            interval.tick().await;
            let now = self.step().await;
            if now != fps {
                debug!(from = fps, to = now, "Producer rate changed");
                fps = now;
                interval = ticker(fps);
                // A fresh interval fires immediately; skip that tick
                interval.tick().await;
            }
        }
        info!("Producer stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::DisplayConfig;
    use crate::pipeline::channel::frame_channel;
    use crate::pipeline::stats::PipelineStats;

    const CONFIG: DisplayConfig = DisplayConfig::DUAL_28X14;

    #[test]
    fn test_period() {
        assert_eq!(period(1), Duration::from_secs(1));
        assert_eq!(period(50), Duration::from_millis(20));
        assert_eq!(period(0), Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_step_without_plugin_sends_nothing() {
        let stats = Arc::new(PipelineStats::new());
        let (tx, _rx) = frame_channel(4, stats.clone());
        let host = Arc::new(Mutex::new(PluginHost::new(CONFIG)));
        Producer::new(host, tx).step().await;
        assert_eq!(stats.snapshot().produced, 0);
    }

    #[tokio::test]
    async fn test_step_sends_rendered_frame() {
        let stats = Arc::new(PipelineStats::new());
        let (tx, mut rx) = frame_channel(4, stats.clone());
        let host = Arc::new(Mutex::new(PluginHost::new(CONFIG)));
        host.lock().await.load("panel_test").unwrap();

        let producer = Producer::new(host.clone(), tx);
        assert_eq!(producer.step().await, 30);
        let frame = rx.recv().await.unwrap();
        assert_eq!(frame.count_on(), 7 * 14 + 196);
    }

    #[tokio::test]
    async fn test_run_stops_when_writer_closes() {
        let stats = Arc::new(PipelineStats::new());
        let (tx, mut rx) = frame_channel(4, stats.clone());
        let host = Arc::new(Mutex::new(PluginHost::new(CONFIG)));
        {
            let mut host = host.lock().await;
            host.load("bouncer").unwrap();
            host.set_frame_rate(60);
        }
        let task = tokio::spawn(Producer::new(host, tx).run());

        assert!(rx.recv().await.is_some());
        assert!(rx.recv().await.is_some());
        drop(rx);
        time::timeout(Duration::from_secs(2), task)
            .await
            .expect("producer did not stop")
            .unwrap();
    }
}
