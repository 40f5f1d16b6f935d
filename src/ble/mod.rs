//! BLE Transport Adapter
//!
//! Maps the bridge onto the SoftDevice: one primary service with the three
//! write and three notify characteristics, advertising, and the per-connection
//! serve loop that feeds GATT writes and the status tick into the bridge.

pub mod advertising;
pub mod server;
pub mod session;
pub mod transport;
