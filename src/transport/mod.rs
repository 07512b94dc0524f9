//! # Display Transport Layer
//!
//! Backends the serial writer hands finished frame bytes to.
//!
//! ## Available Transports
//!
//! - [`serial`]: RS-485 adapter on a TTY device, with reconnect
//! - [`memory`]: In-memory link for tests and dry runs
//!
//! Every backend implements [`DisplayLink`]. The writer thread owns exactly one
//! link; nothing else writes to it.

pub mod memory;
pub mod serial;

pub use memory::MemoryLink;
pub use serial::{ReconnectingSerial, SerialTransport};

use crate::error::FlipdotError;

/// A destination for encoded frames.
pub trait DisplayLink: Send {
    /// Write one logical frame's bytes in a single call.
    fn write_frame(&mut self, bytes: &[u8]) -> Result<(), FlipdotError>;

    /// Human-readable name for logs.
    fn describe(&self) -> String;
}

impl<L: DisplayLink + ?Sized> DisplayLink for Box<L> {
    fn write_frame(&mut self, bytes: &[u8]) -> Result<(), FlipdotError> {
        (**self).write_frame(bytes)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
