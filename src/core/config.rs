//! Bridge Configuration
//!
//! Build-time defaults for the bridge. Nothing here is persisted; every boot
//! starts from [`BridgeConfig::default`].

use ::core::fmt::Write;

use defmt::Format;
use embassy_time::Duration;
use heapless::String;

use crate::radio::Modulation;

/// Maximum device name length that still fits next to the flags in a
/// legacy advertising packet (31 - 3 flag bytes - 2 byte AD header)
pub const MAX_DEVICE_NAME_LEN: usize = 26;

/// Device name buffer
pub type DeviceName = String<MAX_DEVICE_NAME_LEN>;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Format)]
pub enum ConfigError {
    NameTooLong,
    InvalidTickPeriod,
    InvalidFrequency,
}

/// Bridge configuration
#[derive(Debug, Clone, Format)]
pub struct BridgeConfig {
    /// Advertised name prefix; the last two address bytes are appended
    pub device_name_prefix: &'static str,
    /// Period of the status notification while a peer is attached
    pub tick_period: Duration,
    /// Advertising interval (0.625ms units)
    pub adv_interval: u32,
    /// Frequency applied at startup (MHz)
    pub initial_frequency_mhz: f32,
    /// Modulation applied at startup
    pub initial_modulation: Modulation,
    /// Drop config and message writes until the handshake completed
    pub require_handshake: bool,
    /// Forget the handshake when the peer disconnects
    pub reset_handshake_on_disconnect: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            device_name_prefix: "SubGHz-Bridge-",
            tick_period: Duration::from_secs(1),
            adv_interval: 160, // 100ms
            initial_frequency_mhz: 433.0,
            initial_modulation: Modulation::Ook,
            require_handshake: false,
            reset_handshake_on_disconnect: false,
        }
    }
}

impl BridgeConfig {
    /// Check the configuration for values the bridge cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Prefix plus four hex digits of address suffix
        if self.device_name_prefix.len() + 4 > MAX_DEVICE_NAME_LEN {
            return Err(ConfigError::NameTooLong);
        }
        if self.tick_period.as_ticks() == 0 {
            return Err(ConfigError::InvalidTickPeriod);
        }
        if !self.initial_frequency_mhz.is_finite() || self.initial_frequency_mhz <= 0.0 {
            return Err(ConfigError::InvalidFrequency);
        }
        Ok(())
    }

    /// Build the advertised device name from the prefix and a BLE address.
    ///
    /// `addr` is in the SoftDevice's little-endian order, so the two most
    /// significant bytes are the last two.
    pub fn device_name(&self, addr: &[u8; 6]) -> Result<DeviceName, ConfigError> {
        let mut name = DeviceName::new();
        write!(name, "{}{:02X}{:02X}", self.device_name_prefix, addr[5], addr[4])
            .map_err(|_| ConfigError::NameTooLong)?;
        Ok(name)
    }
}
