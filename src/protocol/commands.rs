//! # Panel Commands
//!
//! Each panel payload travels to the controller wrapped in a command:
//!
//! ```text
//! ┌────────┬──────────┬──────────────────────┬──────────┐
//! │ 0x80   │ panel id │ payload (25 bytes)   │ checksum │
//! └────────┴──────────┴──────────────────────┴──────────┘
//!   marker   0 = top    packed panel bits      sum of payload
//!            1 = bottom                        bytes mod 256
//! ```
//!
//! ## Checksum
//!
//! The integrity byte is the wrapping (mod 256) sum of the payload bytes.
//! The marker and panel id are not included.
//!
//! ## Frame Layout
//!
//! One logical frame produces two commands, always top first, concatenated
//! into a single buffer so a frame is written to the serial port in one call:
//!
//! ```text
//! [top command: 28 bytes][bottom command: 28 bytes]
//! ```

use crate::display::DisplayConfig;
use crate::error::FlipdotError;
use crate::frame::BitFrame;

use super::packing::{self, from_hex, to_hex};
use super::panel::{self, Panel, PanelBits};

/// Start-of-command marker byte
pub const START_MARKER: u8 = 0x80;

/// Marker + panel id + checksum
pub const OVERHEAD: usize = 3;

/// Wrapping sum of payload bytes.
pub fn checksum(payload: &[u8]) -> u8 {
    payload.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}

/// A framed panel payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub panel: Panel,
    pub payload: Vec<u8>,
}

impl Command {
    pub fn new(panel: Panel, payload: Vec<u8>) -> Self {
        Self { panel, payload }
    }

    /// Build from a hex-encoded panel payload.
    pub fn from_hex(panel: Panel, hex: &str) -> Result<Self, FlipdotError> {
        Ok(Self::new(panel, from_hex(hex)?))
    }

    /// Encoded length: marker, panel id, payload and checksum.
    pub fn encoded_len(&self) -> usize {
        OVERHEAD + self.payload.len()
    }

    /// Serialize to the wire form.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.write_to(&mut out);
        out
    }

    /// Append the wire form to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.push(START_MARKER);
        out.push(self.panel.id());
        out.extend_from_slice(&self.payload);
        out.push(checksum(&self.payload));
    }

    /// Parse one command whose payload is `payload_len` bytes from the
    /// front of `data`. Returns the command and the bytes consumed.
    pub fn parse(data: &[u8], payload_len: usize) -> Result<(Self, usize), FlipdotError> {
        let total = OVERHEAD + payload_len;
        if data.len() < total {
            return Err(FlipdotError::Protocol(format!(
                "command needs {} bytes, got {}",
                total,
                data.len()
            )));
        }
        if data[0] != START_MARKER {
            return Err(FlipdotError::Protocol(format!(
                "expected start marker 0x{:02x}, got 0x{:02x}",
                START_MARKER, data[0]
            )));
        }
        let panel = Panel::from_id(data[1])
            .ok_or_else(|| FlipdotError::Protocol(format!("unknown panel id {}", data[1])))?;
        let payload = data[2..2 + payload_len].to_vec();
        let expected = checksum(&payload);
        let actual = data[total - 1];
        if expected != actual {
            return Err(FlipdotError::Protocol(format!(
                "checksum mismatch: expected 0x{:02x}, got 0x{:02x}",
                expected, actual
            )));
        }
        Ok((Self { panel, payload }, total))
    }

    /// Payload as lowercase hex.
    pub fn payload_hex(&self) -> String {
        to_hex(&self.payload)
    }
}

/// Build the top and bottom commands for a frame, in write order.
///
/// Each panel goes through the hex payload encoding before framing, the
/// same representation the encoder logs and the dry-run link prints.
pub fn frame_commands(
    frame: &BitFrame,
    config: &DisplayConfig,
) -> Result<[Command; 2], FlipdotError> {
    panel_commands(&panel::split(frame, config))
}

/// Frame already-split panel sequences, top first.
pub fn panel_commands(panels: &PanelBits) -> Result<[Command; 2], FlipdotError> {
    Ok([
        Command::from_hex(Panel::Top, &packing::encode_panel(&panels.top))?,
        Command::from_hex(Panel::Bottom, &packing::encode_panel(&panels.bottom))?,
    ])
}

/// Concatenate commands into one write buffer, preserving order.
pub fn concat(commands: &[Command]) -> Vec<u8> {
    let mut out = Vec::with_capacity(commands.iter().map(Command::encoded_len).sum());
    for command in commands {
        command.write_to(&mut out);
    }
    out
}

/// Encode a frame into its serial bytes.
pub fn encode_frame(frame: &BitFrame, config: &DisplayConfig) -> Result<Vec<u8>, FlipdotError> {
    Ok(concat(&frame_commands(frame, config)?))
}

/// Parse a full frame write back into its two commands.
pub fn parse_frame(data: &[u8], config: &DisplayConfig) -> Result<[Command; 2], FlipdotError> {
    let payload_len = config.panel_bytes();
    let (top, used) = Command::parse(data, payload_len)?;
    let (bottom, used2) = Command::parse(&data[used..], payload_len)?;
    if used + used2 != data.len() {
        return Err(FlipdotError::Protocol(format!(
            "{} trailing bytes after frame",
            data.len() - used - used2
        )));
    }
    if top.panel != Panel::Top || bottom.panel != Panel::Bottom {
        return Err(FlipdotError::Protocol(
            "panels out of order (expected top then bottom)".to_string(),
        ));
    }
    Ok([top, bottom])
}
