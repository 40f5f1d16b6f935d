//! Advertising Payloads
//!
//! Advertising carries the flags and the device name; the scan response
//! carries the bridge service UUID so clients can filter on it.

use nrf_softdevice::ble::advertisement_builder::{
    Flag, LegacyAdvertisementBuilder, LegacyAdvertisementPayload, ServiceList,
};
use nrf_softdevice::ble::peripheral;

use crate::core::config::BridgeConfig;
use crate::core::protocol::uuids;

/// Advertising data: flags and complete local name
pub fn advertisement(name: &str) -> LegacyAdvertisementPayload {
    LegacyAdvertisementBuilder::new()
        .flags(&[Flag::GeneralDiscovery, Flag::LE_Only])
        .full_name(name)
        .build()
}

/// Scan response: the bridge service UUID
pub fn scan_response() -> LegacyAdvertisementPayload {
    LegacyAdvertisementBuilder::new()
        .services_128(ServiceList::Complete, &[uuids::SERVICE])
        .build()
}

/// Peripheral advertising configuration
pub fn peripheral_config(config: &BridgeConfig) -> peripheral::Config {
    peripheral::Config {
        interval: config.adv_interval,
        ..Default::default()
    }
}
