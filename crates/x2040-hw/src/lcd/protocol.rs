//! LCD protocol definitions and encoding.
//!
//! Protocol structure:
//! - Every transmission starts with the command prefix byte 0xFE
//! - Instruction: prefix + one opcode byte
//! - Addressed write: prefix + DDRAM/CGRAM address byte + payload bytes

use crate::{Error, Result, GLYPH_SLOTS, LCD_COLUMNS, LCD_LINES};

/// Command prefix byte.
pub const COMMAND_PREFIX: u8 = 0xFE;

/// Base CGRAM address of glyph slot 0.
pub const GLYPH_BASE_ADDRESS: u8 = 72;

/// Bytes (pixel rows) per glyph.
pub const GLYPH_ROWS: usize = 8;

/// DDRAM address of column 0 for each line.
///
/// Lines 2 and 3 continue lines 0 and 1 in controller memory, hence the
/// interleaved offsets.
pub const LINE_OFFSETS: [u8; LCD_LINES as usize] = [0x80, 0x80 + 0x40, 0x80 + 0x14, 0x80 + 0x54];

/// LCD instruction opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
    /// Clear display contents.
    Clear = 0x01,
    /// Backlight off.
    LightOff = 0x02,
    /// Backlight on.
    LightOn = 0x03,
    /// Entry mode: write at the current cursor.
    Entry = 0x06,
    /// Display off.
    Off = 0x08,
    /// Display on.
    On = 0x0C,
    /// Function set (8-bit bus, two line mode).
    Init = 0x38,
}

/// Instructions sent by power on, in order.
pub const POWER_ON_SEQUENCE: [Command; 4] =
    [Command::On, Command::Init, Command::Clear, Command::LightOn];

/// Instructions sent by power off, in order.
pub const POWER_OFF_SEQUENCE: [Command; 2] = [Command::LightOff, Command::Off];

/// Builds an instruction packet.
pub fn build_instruction(command: Command) -> [u8; 2] {
    [COMMAND_PREFIX, command as u8]
}

/// Returns the DDRAM address for a line and column, checking that `len`
/// bytes starting there stay on the line.
pub fn cursor_address(line: u8, column: u8, len: usize) -> Result<u8> {
    if line >= LCD_LINES {
        return Err(Error::LineOutOfRange(line));
    }
    if len > LCD_COLUMNS as usize {
        return Err(Error::TextTooLong(len));
    }
    if column >= LCD_COLUMNS || column as usize + len > LCD_COLUMNS as usize {
        return Err(Error::ColumnOutOfRange { column, len });
    }
    Ok(LINE_OFFSETS[line as usize] + column)
}

/// Returns the CGRAM address of a glyph slot.
pub fn glyph_address(slot: u8) -> Result<u8> {
    if slot >= GLYPH_SLOTS {
        return Err(Error::InvalidSlot(slot));
    }
    Ok(GLYPH_BASE_ADDRESS + slot * GLYPH_ROWS as u8)
}

/// Returns the column that centers `len` bytes on a line.
pub fn centered_column(len: usize) -> Result<u8> {
    if len > LCD_COLUMNS as usize {
        return Err(Error::TextTooLong(len));
    }
    Ok(((LCD_COLUMNS as usize - len) / 2) as u8)
}

/// Builds an addressed write packet.
pub fn build_addressed(address: u8, payload: &[u8]) -> Vec<u8> {
    let mut packet = Vec::with_capacity(2 + payload.len());
    packet.push(COMMAND_PREFIX);
    packet.push(address);
    packet.extend_from_slice(payload);
    packet
}

/// Builds an entry mode packet writing at the current cursor.
pub fn build_entry(text: &[u8]) -> Vec<u8> {
    build_addressed(Command::Entry as u8, text)
}

/// Builds the byte run that renders the given glyph slots.
///
/// The firmware draws glyph slot `n` for character code `n + 1`. Output is
/// capped at one line.
pub fn glyph_refs(slots: &[u8]) -> Vec<u8> {
    slots
        .iter()
        .take(LCD_COLUMNS as usize)
        .map(|slot| slot.saturating_add(1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_packet() {
        assert_eq!(build_instruction(Command::Clear), [0xFE, 0x01]);
        assert_eq!(build_instruction(Command::Init), [0xFE, 0x38]);
        assert_eq!(build_instruction(Command::On), [0xFE, 0x0C]);
    }

    #[test]
    fn test_line_offsets() {
        assert_eq!(LINE_OFFSETS, [0x80, 0xC0, 0x94, 0xD4]);
        assert_eq!(cursor_address(2, 5, 3).unwrap(), 0x99);
    }

    #[test]
    fn test_cursor_address_bounds() {
        assert!(matches!(
            cursor_address(4, 0, 1),
            Err(Error::LineOutOfRange(4))
        ));
        assert!(matches!(
            cursor_address(0, 0, 21),
            Err(Error::TextTooLong(21))
        ));
        assert!(matches!(
            cursor_address(0, 15, 6),
            Err(Error::ColumnOutOfRange { column: 15, len: 6 })
        ));
        assert_eq!(cursor_address(0, 14, 6).unwrap(), 0x80 + 14);
        assert_eq!(cursor_address(3, 19, 1).unwrap(), 0xD4 + 19);
    }

    #[test]
    fn test_column_past_last_cell() {
        assert!(matches!(
            cursor_address(3, 20, 0),
            Err(Error::ColumnOutOfRange { column: 20, len: 0 })
        ));
        assert_eq!(cursor_address(3, 19, 0).unwrap(), 0xD4 + 19);
    }

    #[test]
    fn test_column_overflow_does_not_wrap() {
        assert!(cursor_address(0, 255, 20).is_err());
    }

    #[test]
    fn test_glyph_address() {
        assert_eq!(glyph_address(0).unwrap(), 72);
        assert_eq!(glyph_address(6).unwrap(), 120);
        assert!(matches!(glyph_address(7), Err(Error::InvalidSlot(7))));
    }

    #[test]
    fn test_centered_column() {
        assert_eq!(centered_column(20).unwrap(), 0);
        assert_eq!(centered_column(19).unwrap(), 0);
        assert_eq!(centered_column(18).unwrap(), 1);
        assert_eq!(centered_column(0).unwrap(), 10);
        assert!(centered_column(21).is_err());
    }

    #[test]
    fn test_entry_packet() {
        assert_eq!(build_entry(b"hi"), vec![0xFE, 0x06, b'h', b'i']);
    }

    #[test]
    fn test_glyph_refs() {
        assert_eq!(glyph_refs(&[0, 1, 2]), vec![1, 2, 3]);
        assert!(glyph_refs(&[]).is_empty());
        assert_eq!(glyph_refs(&[3; 25]).len(), 20);
    }
}
