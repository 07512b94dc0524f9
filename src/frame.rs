//! # Bit-Frames
//!
//! A [`BitFrame`] is one full-grid snapshot of dot states, stored row-major
//! (row 0 first, `index = y * cols + x`). A frame can only be built with
//! exactly `cols * rows` bits, so every frame that exists has passed the
//! length check.
//!
//! ## Wire Message
//!
//! Producers outside the process send frames as JSON text:
//!
//! ```json
//! { "type": "frame", "bits": [0, 1, 0, ...] }
//! ```
//!
//! [`FrameMessage::parse`] rejects anything whose `type` is not `"frame"`,
//! whose `bits` length differs from the grid, or that contains values other
//! than 0 and 1.

use serde::{Deserialize, Serialize};

use crate::display::DisplayConfig;
use crate::error::FlipdotError;

/// One full-grid on/off snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitFrame {
    cols: usize,
    rows: usize,
    bits: Vec<bool>,
}

impl BitFrame {
    /// Build a frame, rejecting any bit count other than `cols * rows`.
    pub fn new(config: &DisplayConfig, bits: Vec<bool>) -> Result<Self, FlipdotError> {
        if bits.len() != config.cells() {
            return Err(FlipdotError::InvalidFrame(format!(
                "expected {} bits for a {}x{} grid, got {}",
                config.cells(),
                config.cols,
                config.rows,
                bits.len()
            )));
        }
        Ok(Self {
            cols: config.cols,
            rows: config.rows,
            bits,
        })
    }

    /// An all-off frame.
    pub fn blank(config: &DisplayConfig) -> Self {
        Self {
            cols: config.cols,
            rows: config.rows,
            bits: vec![false; config.cells()],
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Dot state at column `x`, row `y`. Out-of-range cells read as off.
    pub fn get(&self, x: usize, y: usize) -> bool {
        if x >= self.cols || y >= self.rows {
            return false;
        }
        self.bits[y * self.cols + x]
    }

    /// Set the dot at column `x`, row `y`. Out-of-range cells are ignored.
    pub fn set(&mut self, x: usize, y: usize, on: bool) {
        if x < self.cols && y < self.rows {
            self.bits[y * self.cols + x] = on;
        }
    }

    /// Row-major bits.
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Number of dots turned on.
    pub fn count_on(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Check that this frame was built for `config`'s grid.
    ///
    /// The receiving side of the transport calls this on every frame before it
    /// reaches the panel splitter.
    pub fn validate(&self, config: &DisplayConfig) -> Result<(), FlipdotError> {
        if self.cols != config.cols
            || self.rows != config.rows
            || self.bits.len() != config.cells()
        {
            return Err(FlipdotError::InvalidFrame(format!(
                "frame is {}x{} ({} bits), display is {}x{}",
                self.cols,
                self.rows,
                self.bits.len(),
                config.cols,
                config.rows
            )));
        }
        Ok(())
    }

    /// Wire form: one 0/1 integer per cell.
    pub fn to_wire_bits(&self) -> Vec<u8> {
        self.bits.iter().map(|&b| b as u8).collect()
    }

    /// Render as text, one line per row (`#` = on, `.` = off).
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity((self.cols + 1) * self.rows);
        for y in 0..self.rows {
            for x in 0..self.cols {
                out.push(if self.get(x, y) { '#' } else { '.' });
            }
            out.push('\n');
        }
        out
    }
}

/// Frame message exchanged between producers and the encoder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameMessage {
    /// Message kind; only `"frame"` is accepted.
    #[serde(rename = "type")]
    pub kind: String,
    /// Row-major dot states, 0 or 1.
    pub bits: Vec<u8>,
}

impl FrameMessage {
    pub const KIND: &'static str = "frame";

    /// Wrap a frame for sending.
    pub fn from_frame(frame: &BitFrame) -> Self {
        Self {
            kind: Self::KIND.to_string(),
            bits: frame.to_wire_bits(),
        }
    }

    /// Parse and validate a JSON text message into a [`BitFrame`].
    pub fn parse(text: &str, config: &DisplayConfig) -> Result<BitFrame, FlipdotError> {
        let message: FrameMessage = serde_json::from_str(text)
            .map_err(|e| FlipdotError::InvalidFrame(format!("malformed message: {}", e)))?;
        message.into_frame(config)
    }

    /// Validate shape and convert into a [`BitFrame`].
    pub fn into_frame(self, config: &DisplayConfig) -> Result<BitFrame, FlipdotError> {
        if self.kind != Self::KIND {
            return Err(FlipdotError::InvalidFrame(format!(
                "unexpected message type '{}'",
                self.kind
            )));
        }
        if let Some(bad) = self.bits.iter().find(|&&b| b > 1) {
            return Err(FlipdotError::InvalidFrame(format!(
                "bit values must be 0 or 1, got {}",
                bad
            )));
        }
        BitFrame::new(config, self.bits.into_iter().map(|b| b == 1).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: DisplayConfig = DisplayConfig::DUAL_28X14;

    #[test]
    fn test_new_rejects_wrong_length() {
        assert!(BitFrame::new(&CONFIG, vec![false; 391]).is_err());
        assert!(BitFrame::new(&CONFIG, vec![false; 393]).is_err());
        assert!(BitFrame::new(&CONFIG, vec![]).is_err());
        assert!(BitFrame::new(&CONFIG, vec![false; 392]).is_ok());
    }

    #[test]
    fn test_row_major_indexing() {
        let mut frame = BitFrame::blank(&CONFIG);
        frame.set(3, 2, true);
        assert!(frame.get(3, 2));
        assert!(frame.bits()[2 * 28 + 3]);
        assert_eq!(frame.count_on(), 1);
    }

    #[test]
    fn test_out_of_range_access() {
        let mut frame = BitFrame::blank(&CONFIG);
        frame.set(28, 0, true);
        frame.set(0, 14, true);
        assert_eq!(frame.count_on(), 0);
        assert!(!frame.get(100, 100));
    }

    #[test]
    fn test_validate_other_grid() {
        let small = DisplayConfig {
            cols: 4,
            rows: 2,
            ..CONFIG
        };
        let frame = BitFrame::blank(&small);
        assert!(frame.validate(&small).is_ok());
        assert!(frame.validate(&CONFIG).is_err());
    }

    #[test]
    fn test_parse_valid_message() {
        let mut bits = vec![0u8; 392];
        bits[5] = 1;
        let text = serde_json::json!({ "type": "frame", "bits": bits }).to_string();
        let frame = FrameMessage::parse(&text, &CONFIG).unwrap();
        assert!(frame.get(5, 0));
        assert_eq!(frame.count_on(), 1);
    }

    #[test]
    fn test_parse_rejects_wrong_kind() {
        let text = serde_json::json!({ "type": "hello", "bits": vec![0u8; 392] }).to_string();
        assert!(FrameMessage::parse(&text, &CONFIG).is_err());
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        let text = serde_json::json!({ "type": "frame", "bits": vec![0u8; 196] }).to_string();
        assert!(FrameMessage::parse(&text, &CONFIG).is_err());
    }

    #[test]
    fn test_parse_rejects_non_binary_values() {
        let mut bits = vec![0u8; 392];
        bits[0] = 2;
        let text = serde_json::json!({ "type": "frame", "bits": bits }).to_string();
        assert!(FrameMessage::parse(&text, &CONFIG).is_err());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(FrameMessage::parse("not json", &CONFIG).is_err());
        assert!(FrameMessage::parse("{\"type\":\"frame\"}", &CONFIG).is_err());
    }

    #[test]
    fn test_message_round_trip() {
        let mut frame = BitFrame::blank(&CONFIG);
        frame.set(27, 13, true);
        let text = serde_json::to_string(&FrameMessage::from_frame(&frame)).unwrap();
        assert_eq!(FrameMessage::parse(&text, &CONFIG).unwrap(), frame);
    }
}
