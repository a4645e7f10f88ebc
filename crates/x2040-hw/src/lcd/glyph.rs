//! Custom 5x8 glyphs.
//!
//! A glyph is drawn as 8 strings of 5 characters. A space is a blank dot,
//! anything else is a filled dot. Each row packs into one byte with the
//! leftmost dot in bit 4.

use super::protocol::GLYPH_ROWS;
use crate::{Error, Result};

/// Dots per glyph row.
pub const GLYPH_WIDTH: usize = 5;

const ROW_MASK: u8 = 0b1_1111;

/// A packed custom glyph, ready for `X2040::set_character`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Glyph {
    rows: [u8; GLYPH_ROWS],
}

impl Glyph {
    /// Encodes a glyph from exactly 8 rows of exactly 5 characters.
    pub fn from_rows<S: AsRef<str>>(lines: &[S]) -> Result<Self> {
        if lines.len() != GLYPH_ROWS {
            return Err(Error::GlyphLineCount(lines.len()));
        }

        let mut rows = [0u8; GLYPH_ROWS];
        for (i, line) in lines.iter().enumerate() {
            let line = line.as_ref();
            let width = line.chars().count();
            if width != GLYPH_WIDTH {
                return Err(Error::GlyphLineWidth { line: i, width });
            }
            rows[i] = line
                .chars()
                .enumerate()
                .filter(|&(_, c)| c != ' ')
                .fold(0u8, |acc, (j, _)| acc | 1 << (GLYPH_WIDTH - 1 - j));
        }

        Ok(Self { rows })
    }

    /// Builds a glyph from already packed rows. Bits above bit 4 are dropped.
    pub fn from_bytes(bytes: [u8; GLYPH_ROWS]) -> Self {
        Self {
            rows: bytes.map(|b| b & ROW_MASK),
        }
    }

    /// Returns the packed rows, top to bottom.
    pub fn rows(&self) -> &[u8; GLYPH_ROWS] {
        &self.rows
    }

    /// Renders the glyph back to rows, `#` for filled dots.
    pub fn to_pattern(&self) -> [String; GLYPH_ROWS] {
        self.rows.map(|row| {
            (0..GLYPH_WIDTH)
                .map(|j| {
                    if row & (1 << (GLYPH_WIDTH - 1 - j)) != 0 {
                        '#'
                    } else {
                        ' '
                    }
                })
                .collect()
        })
    }
}

/// Box drawing set used by the splash screen, slots 0-6:
/// top-left corner, horizontal top, top-right corner, vertical,
/// bottom-left corner, horizontal bottom, bottom-right corner.
pub const LINE_DRAWING: [[&str; GLYPH_ROWS]; 7] = [
    [
        "     ", "     ", "     ", "   ##", "  #  ", "  #  ", "  #  ", "  #  ",
    ],
    [
        "     ", "     ", "     ", "#####", "     ", "     ", "     ", "     ",
    ],
    [
        "     ", "     ", "     ", "##   ", "  #  ", "  #  ", "  #  ", "  #  ",
    ],
    [
        "  #  ", "  #  ", "  #  ", "  #  ", "  #  ", "  #  ", "  #  ", "  #  ",
    ],
    [
        "  #  ", "  #  ", "  #  ", "  #  ", "   ##", "     ", "     ", "     ",
    ],
    [
        "     ", "     ", "     ", "     ", "#####", "     ", "     ", "     ",
    ],
    [
        "  #  ", "  #  ", "  #  ", "  #  ", "##   ", "     ", "     ", "     ",
    ],
];
