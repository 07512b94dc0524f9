//! # Display Module
//!
//! Hardware description of the flip-dot display.
//!
//! ## Modules
//!
//! - [`config`]: Grid geometry, render scale and serial defaults

pub mod config;

pub use config::DisplayConfig;
