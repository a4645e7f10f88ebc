//! Error types for the X2040 hardware library.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when interacting with the display.
#[derive(Error, Debug)]
pub enum Error {
    /// No device with the expected VID:PID is attached.
    #[error("X2040 device not found (VID:PID {vendor_id:04X}:{product_id:04X})")]
    DeviceNotFound { vendor_id: u16, product_id: u16 },

    /// USB communication error.
    #[error("USB error: {0}")]
    Usb(#[from] rusb::Error),

    /// A write reported a byte count that does not match what was sent.
    #[error("Unknown error writing to device: wrote {actual} of {expected} bytes")]
    UnknownWrite { expected: usize, actual: usize },

    /// Line index outside the display.
    #[error("Line {0} out of display range (must be 0-3)")]
    LineOutOfRange(u8),

    /// Text longer than one display line.
    #[error("Text of {0} bytes does not fit on a line (max 20)")]
    TextTooLong(usize),

    /// Text would run past the end of the line.
    #[error("Text of {len} bytes at column {column} runs past the end of the line")]
    ColumnOutOfRange { column: u8, len: usize },

    /// Custom glyph slot outside 0-6.
    #[error("Invalid character slot: {0} (must be 0-6)")]
    InvalidSlot(u8),

    /// Glyph definition without exactly 8 lines.
    #[error("Glyphs must be made up of exactly 8 lines, got {0}")]
    GlyphLineCount(usize),

    /// Glyph line that is not exactly 5 characters wide.
    #[error("Glyph line {line} must be exactly 5 characters wide, got {width}")]
    GlyphLineWidth { line: usize, width: usize },
}

impl Error {
    /// Returns true for errors raised before anything was sent to the device.
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            Error::LineOutOfRange(_)
                | Error::TextTooLong(_)
                | Error::ColumnOutOfRange { .. }
                | Error::InvalidSlot(_)
                | Error::GlyphLineCount(_)
                | Error::GlyphLineWidth { .. }
        )
    }
}
