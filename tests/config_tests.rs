#![no_std]
#![no_main]

mod common;

use embassy_time::Duration;
use subghz_ble_bridge::core::config::{BridgeConfig, ConfigError, MAX_DEVICE_NAME_LEN};
use subghz_ble_bridge::core::protocol::{ack_text, status_text, uuids, NotifyChannel};

#[defmt_test::tests]
mod tests {
    use defmt::{assert, assert_eq};

    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = BridgeConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert!(!config.require_handshake);
        assert!(!config.reset_handshake_on_disconnect);
    }

    #[test]
    fn test_invalid_configs_rejected() {
        let long_prefix = BridgeConfig {
            device_name_prefix: "A-Very-Long-Bridge-Prefix-",
            ..BridgeConfig::default()
        };
        assert_eq!(long_prefix.validate(), Err(ConfigError::NameTooLong));

        let zero_tick = BridgeConfig {
            tick_period: Duration::from_ticks(0),
            ..BridgeConfig::default()
        };
        assert_eq!(zero_tick.validate(), Err(ConfigError::InvalidTickPeriod));

        let bad_frequency = BridgeConfig {
            initial_frequency_mhz: f32::NAN,
            ..BridgeConfig::default()
        };
        assert_eq!(bad_frequency.validate(), Err(ConfigError::InvalidFrequency));
    }

    #[test]
    fn test_device_name_from_address() {
        let config = BridgeConfig::default();
        let name = config.device_name(&[0x01, 0x02, 0x03, 0x04, 0xCD, 0xAB]).unwrap();

        assert_eq!(name.as_str(), "SubGHz-Bridge-ABCD");
        assert!(name.len() <= MAX_DEVICE_NAME_LEN);
    }

    #[test]
    fn test_notification_texts() {
        assert_eq!(ack_text(0).as_str(), "ESP32 ACK: 0");
        assert_eq!(status_text(987654).as_str(), "Log data from bridge: 987654");
    }

    #[test]
    fn test_uuid_layout() {
        // 12345678-1234-5678-1234-56789abcdef0, little-endian
        assert_eq!(uuids::SERVICE[0], 0xF0);
        assert_eq!(uuids::SERVICE[1], 0xDE);
        assert_eq!(uuids::SERVICE[15], 0x12);
        assert_eq!(uuids::CONFIG[0], 0xF1);
        assert_eq!(uuids::HANDSHAKE_TX[0], 0xF5);
        assert_eq!(uuids::LOG[1..], uuids::MESSAGE[1..]);
    }

    #[test]
    fn test_notify_channel_indices() {
        for (i, channel) in NotifyChannel::ALL.iter().enumerate() {
            assert_eq!(channel.index(), i);
        }
    }
}
