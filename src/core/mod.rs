//! Core System Infrastructure
//!
//! Provides the pieces every other layer shares that are not tied to a
//! particular BLE stack or radio chip: the logical channel table, the
//! transport contract and the bridge configuration.

pub mod config;
pub mod protocol;
pub mod transport;
