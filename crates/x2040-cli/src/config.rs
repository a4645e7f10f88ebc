//! Configuration management.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use x2040_hw::lcd::{LCD_ENDPOINT, LCD_INTERFACE};
use x2040_hw::{UsbTarget, LCD_PID, LCD_VID};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// USB device configuration
    #[serde(default)]
    pub device: DeviceConfig,
}

/// USB device configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// USB vendor ID
    #[serde(default = "default_vendor_id")]
    pub vendor_id: u16,

    /// USB product ID
    #[serde(default = "default_product_id")]
    pub product_id: u16,

    /// Interface to claim
    #[serde(default = "default_interface")]
    pub interface: u8,

    /// Bulk OUT endpoint number
    #[serde(default = "default_endpoint")]
    pub endpoint: u8,

    /// Bulk write timeout in milliseconds (0 waits forever)
    #[serde(default)]
    pub timeout_ms: u64,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            vendor_id: default_vendor_id(),
            product_id: default_product_id(),
            interface: default_interface(),
            endpoint: default_endpoint(),
            timeout_ms: 0,
        }
    }
}

impl From<&DeviceConfig> for UsbTarget {
    fn from(device: &DeviceConfig) -> Self {
        UsbTarget {
            vendor_id: device.vendor_id,
            product_id: device.product_id,
            interface: device.interface,
            endpoint: device.endpoint,
            timeout: Duration::from_millis(device.timeout_ms),
        }
    }
}

// Default value functions
fn default_vendor_id() -> u16 {
    LCD_VID
}

fn default_product_id() -> u16 {
    LCD_PID
}

fn default_interface() -> u8 {
    LCD_INTERFACE
}

fn default_endpoint() -> u8 {
    LCD_ENDPOINT
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read configuration file")?;
        Self::parse(&content)
    }

    /// Parses configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.device.vendor_id, 0x0403);
        assert_eq!(config.device.product_id, 0x6001);
        assert_eq!(config.device.endpoint, 2);
        assert_eq!(UsbTarget::from(&config.device), UsbTarget::default());
    }

    #[test]
    fn test_partial_device_table() {
        let config = Config::parse(
            r#"
            [device]
            product_id = 0x6015
            timeout_ms = 250
            "#,
        )
        .unwrap();
        let target = UsbTarget::from(&config.device);
        assert_eq!(target.vendor_id, 0x0403);
        assert_eq!(target.product_id, 0x6015);
        assert_eq!(target.timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_shipped_config() {
        let config = Config::parse(include_str!("../../../config/default.toml")).unwrap();
        assert_eq!(UsbTarget::from(&config.device), UsbTarget::default());
    }

    #[test]
    fn test_invalid_config() {
        assert!(Config::parse("[device]\nendpoint = 300").is_err());
    }
}
