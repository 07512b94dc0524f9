//! # Flip-Dot Device Protocol
//!
//! This module turns a validated [`BitFrame`](crate::frame::BitFrame) into the
//! bytes written to the display controller.
//!
//! ## Module Structure
//!
//! - [`panel`]: Split a frame into the two panel bit-sequences (fixed wiring order)
//! - [`packing`]: Pack bits MSB-first into bytes and encode them as hex
//! - [`commands`]: Wrap each panel payload in a framed, checksummed command
//!
//! ## Usage Example
//!
//! ```
//! use flipdot::display::DisplayConfig;
//! use flipdot::frame::BitFrame;
//! use flipdot::protocol::commands;
//!
//! let config = DisplayConfig::DUAL_28X14;
//! let frame = BitFrame::blank(&config);
//!
//! // Two commands (top then bottom), 28 bytes each
//! let data = commands::encode_frame(&frame, &config)?;
//! assert_eq!(data.len(), 56);
//! assert_eq!(data[0], commands::START_MARKER);
//! assert_eq!(data[1], 0); // top panel id
//! assert_eq!(data[28 + 1], 1); // bottom panel id
//! # Ok::<(), flipdot::error::FlipdotError>(())
//! ```

pub mod commands;
pub mod packing;
pub mod panel;
