//! # Flipdot - Dual-Panel Flip-Dot Frame Pipeline
//!
//! Flipdot drives a 28x14 flip-dot display made of two 28x7 panels behind a
//! single serial adapter. It provides:
//!
//! - **Plugins**: Animations that draw into a raster canvas each frame
//! - **Sampling**: Canvas to bit-frame reduction at a fixed point per dot
//! - **Protocol**: Panel split, MSB-first packing and checksummed commands
//! - **Pipeline**: Producer, bounded transport and a single serial writer
//! - **Server**: Web controller and WebSocket frame ingest
//!
//! ## Quick Start
//!
//! ```no_run
//! use flipdot::{
//!     display::DisplayConfig,
//!     host::PluginHost,
//!     protocol::commands,
//!     transport::{DisplayLink, SerialTransport},
//! };
//!
//! let config = DisplayConfig::DUAL_28X14;
//! let mut transport = SerialTransport::open("/dev/ttyUSB0", config.baud_rate)?;
//!
//! let mut host = PluginHost::new(config);
//! host.load("panel_test")?;
//!
//! if let Some(frame) = host.tick()? {
//!     transport.write_frame(&commands::encode_frame(&frame, &config)?)?;
//! }
//! # Ok::<(), flipdot::error::FlipdotError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`display`] | Grid geometry and serial defaults |
//! | [`frame`] | Bit-frames and the frame message |
//! | [`render`] | Canvas, sampler, fonts and PNG previews |
//! | [`plugins`] | Built-in animations and the plugin contract |
//! | [`host`] | Active plugin lifecycle |
//! | [`protocol`] | Device encoding |
//! | [`pipeline`] | Producer, transport, encoder and writer |
//! | [`transport`] | Serial and in-memory links |
//! | [`server`] | HTTP controller |
//! | [`error`] | Error types |

pub mod display;
pub mod error;
pub mod frame;
pub mod host;
pub mod pipeline;
pub mod plugins;
pub mod protocol;
pub mod render;
pub mod server;
pub mod shader;
pub mod transport;

// Re-exports for convenience
pub use display::DisplayConfig;
pub use error::FlipdotError;
pub use frame::BitFrame;
pub use host::PluginHost;
