//! # Flipdot CLI
//!
//! Command-line interface for the dual-panel flip-dot display.
//!
//! ## Usage
//!
//! ```bash
//! # List available plugins
//! flipdot list
//!
//! # Run the web controller
//! flipdot serve --device /dev/ttyUSB0 --plugin wave
//!
//! # Run without hardware, logging each frame
//! flipdot serve --dry-run
//!
//! # Preview a plugin as ASCII, or save a PNG
//! flipdot preview bouncer --frames 10
//! flipdot preview noise --png noise.png
//!
//! # Print the encoded panel payloads
//! flipdot encode panel_test
//!
//! # Drive the display directly without the web controller
//! flipdot send fireworks --frames 300
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

use flipdot::{
    DisplayConfig, FlipdotError, PluginHost,
    frame::BitFrame,
    pipeline::{DEFAULT_DEPTH, Pipeline},
    plugins::{self, DEFAULT_FRAME_RATE},
    protocol::commands,
    render,
    server::{self, ServerConfig},
    transport::{ReconnectingSerial, serial},
};

/// Flipdot - Dual-panel flip-dot display driver
#[derive(Parser, Debug)]
#[command(name = "flipdot")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the web controller and frame pipeline
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "0.0.0.0:3000")]
        listen: String,

        /// Serial device path
        #[arg(long, default_value = serial::DEFAULT_DEVICE)]
        device: String,

        /// Serial baud rate
        #[arg(long, default_value_t = serial::DEFAULT_BAUD)]
        baud: u32,

        /// Initial frame rate
        #[arg(long, default_value_t = DEFAULT_FRAME_RATE)]
        fps: u32,

        /// Plugin to load at startup
        #[arg(long)]
        plugin: Option<String>,

        /// Frames buffered between producers and the serial writer
        #[arg(long, default_value_t = DEFAULT_DEPTH)]
        queue_depth: usize,

        /// Log frames instead of opening the serial device
        #[arg(long)]
        dry_run: bool,
    },

    /// List available plugins
    List,

    /// Render a plugin offline and show the last frame
    Preview {
        /// Plugin name
        plugin: String,

        /// Frames to render before showing
        #[arg(long, default_value_t = 1)]
        frames: u64,

        /// Save a PNG instead of printing ASCII
        #[arg(long, value_name = "FILE")]
        png: Option<PathBuf>,

        /// PNG pixels per dot
        #[arg(long, default_value_t = 20)]
        scale: u32,
    },

    /// Print the panel payloads a plugin produces
    Encode {
        /// Plugin name
        plugin: String,

        /// Frames to encode
        #[arg(long, default_value_t = 1)]
        frames: u64,
    },

    /// Drive the display with a plugin, without the web controller
    Send {
        /// Plugin name
        plugin: String,

        /// Serial device path
        #[arg(long, default_value = serial::DEFAULT_DEVICE)]
        device: String,

        /// Serial baud rate
        #[arg(long, default_value_t = serial::DEFAULT_BAUD)]
        baud: u32,

        /// Frames to send
        #[arg(long, default_value_t = 300)]
        frames: u64,

        /// Frame rate
        #[arg(long, default_value_t = DEFAULT_FRAME_RATE)]
        fps: u32,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("flipdot=info,tower_http=info")),
        )
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), FlipdotError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            listen,
            device,
            baud,
            fps,
            plugin,
            queue_depth,
            dry_run,
        } => {
            let config = ServerConfig {
                listen_addr: listen,
                device_path: device,
                display: display(baud),
                plugin,
                frame_rate: fps,
                queue_depth: queue_depth.max(1),
                dry_run,
            };
            tokio::runtime::Runtime::new()?.block_on(server::serve(config))
        }

        Commands::List => {
            println!("Available plugins:");
            for name in plugins::PLUGINS {
                println!("  {}", name);
            }
            Ok(())
        }

        Commands::Preview {
            plugin,
            frames,
            png,
            scale,
        } => {
            let frame = render_frames(&plugin, frames, |_| {})?;
            match png {
                Some(path) => {
                    render::save_frame_png(&path, &frame, scale)?;
                    println!("Saved to {}", path.display());
                }
                None => print!("{}", frame.to_ascii()),
            }
            Ok(())
        }

        Commands::Encode { plugin, frames } => {
            let config = DisplayConfig::DUAL_28X14;
            let mut failure = None;
            render_frames(&plugin, frames, |frame| {
                if failure.is_some() {
                    return;
                }
                match commands::frame_commands(frame, &config) {
                    Ok(cmds) => {
                        for cmd in &cmds {
                            println!(
                                "{:?}\t{}\t0x{:02x}",
                                cmd.panel,
                                cmd.payload_hex(),
                                commands::checksum(&cmd.payload)
                            );
                        }
                    }
                    Err(e) => failure = Some(e),
                }
            })?;
            failure.map_or(Ok(()), Err)
        }

        Commands::Send {
            plugin,
            device,
            baud,
            frames,
            fps,
        } => send(&plugin, &device, display(baud), frames, fps),
    }
}

fn display(baud: u32) -> DisplayConfig {
    DisplayConfig {
        baud_rate: baud,
        ..DisplayConfig::DUAL_28X14
    }
}

/// Render `frames` frames of a plugin, calling `each` on every one, and
/// return the last.
fn render_frames(
    plugin: &str,
    frames: u64,
    mut each: impl FnMut(&BitFrame),
) -> Result<BitFrame, FlipdotError> {
    let config = DisplayConfig::DUAL_28X14;
    let mut host = PluginHost::new(config);
    host.load(plugin)?;

    let mut last = BitFrame::blank(&config);
    for _ in 0..frames.max(1) {
        if let Some(frame) = host.tick()? {
            each(&frame);
            last = frame;
        }
    }
    Ok(last)
}

/// Paced render loop straight into the serial pipeline.
fn send(
    plugin: &str,
    device: &str,
    config: DisplayConfig,
    frames: u64,
    fps: u32,
) -> Result<(), FlipdotError> {
    let mut host = PluginHost::new(config);
    host.set_frame_rate(fps);
    host.load(plugin)?;

    let link = ReconnectingSerial::new(device, config.baud_rate);
    let pipeline = Pipeline::start(config, link, DEFAULT_DEPTH)?;
    info!(plugin, device, frames, "Sending");

    let started = Instant::now();
    let mut next = Instant::now();
    for _ in 0..frames {
        if let Some(frame) = host.tick()? {
            pipeline.sender.send(frame);
        }
        next += Duration::from_secs_f64(1.0 / host.frame_rate() as f64);
        if let Some(wait) = next.checked_duration_since(Instant::now()) {
            thread::sleep(wait);
        }
    }

    let stats = pipeline.stats.clone();
    pipeline.finish()?;
    let stats = stats.snapshot();
    info!(
        written = stats.written,
        dropped = stats.dropped,
        failures = stats.write_failures,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Done"
    );
    Ok(())
}
