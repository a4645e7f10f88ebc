//! Pertelian X2040 Hardware Library
//!
//! Drives the Pertelian X2040, a 4x20 character LCD behind an FTDI USB bridge,
//! by writing its byte-oriented command protocol to a USB bulk endpoint.

pub mod error;
pub mod lcd;

pub use error::{Error, Result};
pub use lcd::{Glyph, OutEndpoint, PowerState, UsbEndpoint, UsbTarget, X2040};

/// Number of character lines on the display.
pub const LCD_LINES: u8 = 4;

/// Number of character columns per line.
pub const LCD_COLUMNS: u8 = 20;

/// Number of custom glyph slots.
pub const GLYPH_SLOTS: u8 = 7;

/// USB VID:PID for the display (FTDI FT232 bridge).
pub const LCD_VID: u16 = 0x0403;
pub const LCD_PID: u16 = 0x6001;
