//! LCD device control over a USB bulk endpoint.

use crate::{Error, Result, LCD_COLUMNS};
use tracing::{debug, info};

use super::glyph::{Glyph, LINE_DRAWING};
use super::protocol::{
    self, build_addressed, build_entry, build_instruction, centered_column, cursor_address,
    glyph_address, Command, POWER_OFF_SEQUENCE, POWER_ON_SEQUENCE,
};
use super::transport::{OutEndpoint, UsbEndpoint, UsbTarget};

/// Bytes at the start of a transmission that need time to latch.
const LATCHED_BYTES: usize = 3;

/// Title shown on the splash screen.
const SPLASH_TITLE: &str = "Pertelian  X2040";

/// Last state commanded for the display or backlight.
///
/// The device cannot be queried, so this starts out unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PowerState {
    #[default]
    Unknown,
    On,
    Off,
}

impl From<bool> for PowerState {
    fn from(on: bool) -> Self {
        if on {
            PowerState::On
        } else {
            PowerState::Off
        }
    }
}

impl std::fmt::Display for PowerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PowerState::Unknown => write!(f, "unknown"),
            PowerState::On => write!(f, "on"),
            PowerState::Off => write!(f, "off"),
        }
    }
}

/// Pertelian X2040 display controller.
///
/// Every method writes straight through to the endpoint. There is no
/// internal locking; share a driver behind a `Mutex` if needed.
pub struct X2040<E = UsbEndpoint> {
    endpoint: E,
    display: PowerState,
    backlight: PowerState,
}

impl X2040<UsbEndpoint> {
    /// Opens the display at its default VID:PID.
    pub fn open() -> Result<Self> {
        Self::open_with(&UsbTarget::default())
    }

    /// Opens the display at the given USB location.
    ///
    /// Nothing is sent to the display; call [`X2040::power_on`] to initialize it.
    pub fn open_with(target: &UsbTarget) -> Result<Self> {
        Ok(Self::new(UsbEndpoint::open(target)?))
    }
}

impl<E: OutEndpoint> X2040<E> {
    /// Wraps an already opened endpoint.
    pub fn new(endpoint: E) -> Self {
        Self {
            endpoint,
            display: PowerState::Unknown,
            backlight: PowerState::Unknown,
        }
    }

    /// Last commanded display power state.
    pub fn display_state(&self) -> PowerState {
        self.display
    }

    /// Last commanded backlight state.
    pub fn backlight_state(&self) -> PowerState {
        self.backlight
    }

    /// Writes one transmission, one byte per transfer.
    ///
    /// The controller corrupts multi-byte transfers, and needs a moment to
    /// latch each of the first three bytes.
    pub fn write(&mut self, data: &[u8]) -> Result<usize> {
        let mut written = 0;
        for (i, byte) in data.iter().enumerate() {
            let sent = self.endpoint.write(std::slice::from_ref(byte))?;
            if sent != 1 {
                return Err(Error::UnknownWrite {
                    expected: data.len(),
                    actual: written + sent,
                });
            }
            written += sent;
            if i < LATCHED_BYTES {
                self.endpoint.latch();
            }
        }
        debug!("Sent {} bytes: {:02X?}", written, data);
        Ok(written)
    }

    /// Writes `data` in one transfer with no pacing.
    ///
    /// The display frequently garbles these. Only useful for experimenting
    /// with the hardware; everything else goes through [`X2040::write`].
    pub fn write_unpaced(&mut self, data: &[u8]) -> Result<usize> {
        let written = self.endpoint.write(data)?;
        debug!("Sent {} of {} bytes unpaced", written, data.len());
        Ok(written)
    }

    /// Sends one instruction.
    fn inst(&mut self, command: Command) -> Result<()> {
        self.write(&build_instruction(command))?;
        Ok(())
    }

    /// Sends instructions in order, stopping at the first failure.
    fn run(&mut self, commands: &[Command]) -> Result<()> {
        commands.iter().try_for_each(|&command| self.inst(command))
    }

    /// Turns the display on, initializes it, clears it and lights it.
    pub fn power_on(&mut self) -> Result<()> {
        self.run(&POWER_ON_SEQUENCE)?;
        self.display = PowerState::On;
        self.backlight = PowerState::On;
        info!("Display powered on");
        Ok(())
    }

    /// Turns the light off, then the display.
    pub fn power_off(&mut self) -> Result<()> {
        self.run(&POWER_OFF_SEQUENCE)?;
        self.display = PowerState::Off;
        self.backlight = PowerState::Off;
        info!("Display powered off");
        Ok(())
    }

    /// Clears all visible text.
    pub fn clear(&mut self) -> Result<()> {
        self.inst(Command::Clear)
    }

    /// Switches the backlight.
    pub fn set_backlight(&mut self, on: bool) -> Result<()> {
        self.inst(if on {
            Command::LightOn
        } else {
            Command::LightOff
        })?;
        self.backlight = on.into();
        Ok(())
    }

    /// Writes text at the device's current cursor.
    pub fn print(&mut self, text: impl AsRef<[u8]>) -> Result<()> {
        self.write(&build_entry(text.as_ref()))?;
        Ok(())
    }

    /// Writes text starting at a line (0-3) and column (0-19).
    ///
    /// The text must fit on the line; nothing is sent if it does not.
    pub fn print_at(&mut self, line: u8, column: u8, text: impl AsRef<[u8]>) -> Result<()> {
        let text = text.as_ref();
        let address = cursor_address(line, column, text.len())?;
        self.write(&build_addressed(address, text))?;
        Ok(())
    }

    /// Writes text centered on a line, rounding left.
    pub fn print_centered(&mut self, line: u8, text: impl AsRef<[u8]>) -> Result<()> {
        let text = text.as_ref();
        let column = centered_column(text.len())?;
        self.print_at(line, column, text)
    }

    /// Overwrites a line with spaces.
    pub fn blank_line(&mut self, line: u8) -> Result<()> {
        self.print_at(line, 0, [b' '; LCD_COLUMNS as usize])
    }

    /// Stores a custom glyph in slot 0-6.
    pub fn set_character(&mut self, slot: u8, glyph: &Glyph) -> Result<()> {
        let address = glyph_address(slot)?;
        self.write(&build_addressed(address, glyph.rows()))?;
        debug!("Stored glyph in slot {}", slot);
        Ok(())
    }

    /// Returns the characters that render the given glyph slots, in order.
    ///
    /// At most one line (20) of references is returned.
    pub fn glyph_refs(&self, slots: &[u8]) -> Vec<u8> {
        protocol::glyph_refs(slots)
    }

    /// Stores the box drawing glyphs in slots 0-6.
    pub fn set_line_drawing_characters(&mut self) -> Result<()> {
        for (slot, pattern) in (0u8..).zip(LINE_DRAWING.iter()) {
            let glyph = Glyph::from_rows(pattern)?;
            self.set_character(slot, &glyph)?;
        }
        Ok(())
    }

    /// Draws a boxed banner with the driver name and version.
    ///
    /// Overwrites all custom glyph slots.
    pub fn draw_splash(&mut self) -> Result<()> {
        self.set_line_drawing_characters()?;

        let inner = LCD_COLUMNS as usize - 2;
        let right = LCD_COLUMNS - 1;

        let mut top = vec![0u8];
        top.extend(std::iter::repeat(1).take(inner));
        top.push(2);
        let mut bottom = vec![4u8];
        bottom.extend(std::iter::repeat(5).take(inner));
        bottom.push(6);

        let version = concat!("x2040-hw v", env!("CARGO_PKG_VERSION"));

        self.print_at(0, 0, self.glyph_refs(&top))?;
        for (line, text) in [(1, SPLASH_TITLE), (2, version)] {
            self.print_at(line, 0, self.glyph_refs(&[3]))?;
            self.print_centered(line, text)?;
            self.print_at(line, right, self.glyph_refs(&[3]))?;
        }
        self.print_at(3, 0, self.glyph_refs(&bottom))?;

        info!("Splash screen drawn");
        Ok(())
    }

    /// Releases the interface and closes the device.
    ///
    /// The display keeps its contents, power and backlight state.
    pub fn close(mut self) -> Result<()> {
        self.endpoint.release()?;
        info!("LCD device closed");
        Ok(())
    }
}
