//! Bitmap text for the dot grid.
//!
//! Uses the Spleen bitmap font family. One font pixel maps to one dot, so the
//! 6x12 face fits the 14-row grid with a row to spare above and below.

use spleen_font::{FONT_6X12, FONT_8X16, PSF2Font};

use crate::error::FlipdotError;

/// Available text faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    /// Spleen 6x12
    Small,
    /// Spleen 8x16 (taller than the grid; bottom rows are clipped)
    Large,
}

impl Face {
    pub fn from_name(name: &str) -> Option<Face> {
        match name.to_lowercase().as_str() {
            "small" | "6x12" => Some(Face::Small),
            "large" | "8x16" => Some(Face::Large),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Face::Small => "small",
            Face::Large => "large",
        }
    }

    /// Glyph cell size (width, height) in dots.
    pub fn glyph_size(self) -> (usize, usize) {
        match self {
            Face::Small => (6, 12),
            Face::Large => (8, 16),
        }
    }

    fn data(self) -> &'static [u8] {
        match self {
            Face::Small => FONT_6X12,
            Face::Large => FONT_8X16,
        }
    }
}

/// A rendered line of text as a 1-bit mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMask {
    pub width: usize,
    pub height: usize,
    pub bits: Vec<bool>,
}

impl TextMask {
    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.bits[y * self.width + x]
    }
}

/// Render `text` on a single line. Characters missing from the font are
/// drawn as an outlined box.
pub fn render_line(text: &str, face: Face) -> Result<TextMask, FlipdotError> {
    let mut font = PSF2Font::new(face.data())
        .map_err(|_| FlipdotError::Plugin(format!("failed to load {} font", face.name())))?;
    let (gw, gh) = face.glyph_size();
    let count = text.chars().count();
    let width = gw * count;
    let mut bits = vec![false; width * gh];

    for (i, ch) in text.chars().enumerate() {
        let x0 = i * gw;
        let mut buf = [0u8; 4];
        let utf8 = ch.encode_utf8(&mut buf);
        match font.glyph_for_utf8(utf8.as_bytes()) {
            Some(glyph) => {
                for (gy, row) in glyph.enumerate() {
                    for (gx, on) in row.enumerate() {
                        if on && gx < gw && gy < gh {
                            bits[gy * width + x0 + gx] = true;
                        }
                    }
                }
            }
            None => {
                for gy in 1..gh - 1 {
                    for gx in 0..gw - 1 {
                        if gy == 1 || gy == gh - 2 || gx == 0 || gx == gw - 2 {
                            bits[gy * width + x0 + gx] = true;
                        }
                    }
                }
            }
        }
    }

    Ok(TextMask {
        width,
        height: gh,
        bits,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_dimensions() {
        let mask = render_line("HI", Face::Small).unwrap();
        assert_eq!(mask.width, 12);
        assert_eq!(mask.height, 12);
        assert_eq!(mask.bits.len(), 144);
    }

    #[test]
    fn test_letters_have_ink_and_space_does_not() {
        let mask = render_line("A ", Face::Small).unwrap();
        let ink = |xs: std::ops::Range<usize>| {
            (0..12).any(|y| xs.clone().any(|x| mask.get(x, y)))
        };
        assert!(ink(0..6));
        assert!(!ink(6..12));
    }

    #[test]
    fn test_empty_text() {
        let mask = render_line("", Face::Large).unwrap();
        assert_eq!(mask.width, 0);
        assert!(mask.bits.is_empty());
    }

    #[test]
    fn test_face_names() {
        assert_eq!(Face::from_name("SMALL"), Some(Face::Small));
        assert_eq!(Face::from_name("8x16"), Some(Face::Large));
        assert_eq!(Face::from_name("huge"), None);
    }
}
