//! LCD display module.
//!
//! Provides control over the 4x20 character display via USB bulk writes.

mod device;
mod transport;

pub mod glyph;
pub mod protocol;

pub use device::{PowerState, X2040};
pub use glyph::Glyph;
pub use protocol::Command;
pub use transport::{
    OutEndpoint, UsbEndpoint, UsbTarget, LATCH_DELAY, LCD_ENDPOINT, LCD_INTERFACE,
};
