//! # Bit Packing and Hex Encoding
//!
//! Panel bit-sequences are packed into bytes most-significant-bit first.
//! A final partial byte is padded with zero bits.
//!
//! ```text
//! bits:  1 0 1 0 1 0 1 0 | 1 1 1 1
//! bytes: 0xAA            | 0xF0   (4 padding zeros)
//! hex:   "aaf0"
//! ```
//!
//! The hex form is lowercase, two characters per byte, so a sequence of `n`
//! bits always encodes to `ceil(n / 8) * 2` characters.

use crate::error::FlipdotError;

/// Pack bits MSB-first, zero-padding the last byte.
pub fn pack_bits(bits: &[bool]) -> Vec<u8> {
    let mut bytes = vec![0u8; bits.len().div_ceil(8)];
    for (i, _) in bits.iter().enumerate().filter(|(_, b)| **b) {
        bytes[i / 8] |= 0x80 >> (i % 8);
    }
    bytes
}

/// Unpack the first `len` bits of `bytes`, MSB-first.
///
/// Positions past the end of `bytes` read as off.
pub fn unpack_bits(bytes: &[u8], len: usize) -> Vec<bool> {
    (0..len)
        .map(|i| {
            bytes
                .get(i / 8)
                .is_some_and(|byte| byte & (0x80 >> (i % 8)) != 0)
        })
        .collect()
}

/// Lowercase hex, two characters per byte.
pub fn to_hex(bytes: &[u8]) -> String {
    const DIGITS: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for &byte in bytes {
        out.push(DIGITS[(byte >> 4) as usize] as char);
        out.push(DIGITS[(byte & 0x0F) as usize] as char);
    }
    out
}

/// Decode a hex string (either case) into bytes.
pub fn from_hex(hex: &str) -> Result<Vec<u8>, FlipdotError> {
    if hex.len() % 2 != 0 {
        return Err(FlipdotError::Protocol(format!(
            "hex payload has odd length {}",
            hex.len()
        )));
    }
    hex.as_bytes()
        .chunks(2)
        .map(|pair| -> Result<u8, FlipdotError> { Ok((nibble(pair[0])? << 4) | nibble(pair[1])?) })
        .collect()
}

fn nibble(c: u8) -> Result<u8, FlipdotError> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        b'A'..=b'F' => Ok(c - b'A' + 10),
        _ => Err(FlipdotError::Protocol(format!(
            "invalid hex digit '{}'",
            c as char
        ))),
    }
}

/// Pack a panel bit-sequence and hex-encode it.
pub fn encode_panel(bits: &[bool]) -> String {
    to_hex(&pack_bits(bits))
}

/// Inverse of [`encode_panel`] for a sequence of `len` bits.
pub fn decode_panel(hex: &str, len: usize) -> Result<Vec<bool>, FlipdotError> {
    let bytes = from_hex(hex)?;
    if bytes.len() != len.div_ceil(8) {
        return Err(FlipdotError::Protocol(format!(
            "payload of {} bytes cannot hold exactly {} bits",
            bytes.len(),
            len
        )));
    }
    Ok(unpack_bits(&bytes, len))
}
