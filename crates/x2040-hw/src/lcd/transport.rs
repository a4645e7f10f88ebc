//! USB transport.
//!
//! The display protocol only needs a write-only byte sink. `OutEndpoint`
//! abstracts that sink; `UsbEndpoint` implements it with libusb bulk writes.

use crate::{Error, Result, LCD_PID, LCD_VID};
use rusb::{Context, DeviceHandle, UsbContext};
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

/// Bulk OUT endpoint number used by the display.
pub const LCD_ENDPOINT: u8 = 2;

/// Interface number of the default configuration.
pub const LCD_INTERFACE: u8 = 0;

/// Pause the controller needs to latch a byte at the start of a transmission.
pub const LATCH_DELAY: Duration = Duration::from_micros(1);

/// A write-only byte sink with no acknowledgment from the display.
pub trait OutEndpoint {
    /// Writes `data` in a single transfer, returning the number of bytes sent.
    fn write(&mut self, data: &[u8]) -> Result<usize>;

    /// Waits for the display to latch the byte just written.
    fn latch(&mut self) {
        thread::sleep(LATCH_DELAY);
    }

    /// Releases the endpoint. The endpoint must not be written to afterwards.
    fn release(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Where to find the display on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsbTarget {
    pub vendor_id: u16,
    pub product_id: u16,
    pub interface: u8,
    /// OUT endpoint number, without the direction bit.
    pub endpoint: u8,
    /// Bulk write timeout. Zero waits forever.
    pub timeout: Duration,
}

impl Default for UsbTarget {
    fn default() -> Self {
        Self {
            vendor_id: LCD_VID,
            product_id: LCD_PID,
            interface: LCD_INTERFACE,
            endpoint: LCD_ENDPOINT,
            timeout: Duration::ZERO,
        }
    }
}

/// A claimed bulk OUT endpoint on an opened USB device.
pub struct UsbEndpoint {
    handle: DeviceHandle<Context>,
    interface: u8,
    address: u8,
    timeout: Duration,
    claimed: bool,
}

impl UsbEndpoint {
    /// Opens the device by VID:PID, claims its interface and binds the OUT endpoint.
    pub fn open(target: &UsbTarget) -> Result<Self> {
        let context = Context::new()?;

        let device = context
            .devices()?
            .iter()
            .find_map(|device| match device.device_descriptor() {
                Ok(desc)
                    if desc.vendor_id() == target.vendor_id
                        && desc.product_id() == target.product_id =>
                {
                    Some(Ok(device))
                }
                Ok(_) => None,
                Err(e) => Some(Err(e)),
            })
            .ok_or(Error::DeviceNotFound {
                vendor_id: target.vendor_id,
                product_id: target.product_id,
            })??;

        // Open failures (permissions, busy) are transport errors, not absence
        let handle = device.open()?;

        // ftdi_sio usually owns the interface on Linux
        if let Err(e) = handle.set_auto_detach_kernel_driver(true) {
            debug!("Kernel driver auto-detach unavailable: {}", e);
        }

        handle.claim_interface(target.interface)?;

        let address = target.endpoint & 0x0F;
        info!(
            "LCD device opened (VID:{:04X} PID:{:04X}, interface={}, endpoint=0x{:02X})",
            target.vendor_id, target.product_id, target.interface, address
        );

        Ok(Self {
            handle,
            interface: target.interface,
            address,
            timeout: target.timeout,
            claimed: true,
        })
    }
}

impl OutEndpoint for UsbEndpoint {
    fn write(&mut self, data: &[u8]) -> Result<usize> {
        Ok(self.handle.write_bulk(self.address, data, self.timeout)?)
    }

    fn release(&mut self) -> Result<()> {
        if self.claimed {
            self.claimed = false;
            self.handle.release_interface(self.interface)?;
            debug!("Released interface {}", self.interface);
        }
        Ok(())
    }
}

impl Drop for UsbEndpoint {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            debug!("Failed to release interface on drop: {}", e);
        }
    }
}
