#![no_std]

//! Sub-GHz BLE Bridge Firmware Library
//!
//! This library provides the core functionality for the BLE to sub-GHz radio
//! bridge, organized into clear architectural layers:
//!
//! - `core`: Channel table, transport contract and configuration
//! - `commands`: Configuration command parsing and application
//! - `session`: Handshake, message exchange and connection state
//! - `radio`: Radio contract and the CC1101 driver adapter
//! - `ble`: GATT server, advertising and notification glue

pub mod ble;
pub mod commands;
pub mod core;
pub mod radio;
pub mod session;
