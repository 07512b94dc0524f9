//! # Error Types
//!
//! This module defines the error type used throughout the flipdot library.
//!
//! Pipeline stages never let these escape their own boundary: the frame
//! transport, encoder and serial writer log the error and drop the frame.
//! Errors only surface to callers at the edges (CLI, HTTP handlers, opening
//! devices).

use thiserror::Error;

/// Main error type for flipdot operations
#[derive(Debug, Error)]
pub enum FlipdotError {
    /// Serial link errors (port not open, write failure, TTY setup)
    #[error("Transport error: {0}")]
    Transport(String),

    /// A bit-frame that does not match the grid or the wire shape
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    /// Malformed device command or payload encoding
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Plugin lookup, load or control error
    #[error("Plugin error: {0}")]
    Plugin(String),

    /// Image processing error
    #[error("Image error: {0}")]
    Image(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
