//! GATT Transport
//!
//! [`Transport`] implementation over a live SoftDevice connection.
//! Notifications go out through `gatt_server::notify_value`; resuming
//! advertising wakes the advertising loop through [`ADVERTISE`].

use defmt::{debug, warn};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use nrf_softdevice::ble::gatt_server;
use nrf_softdevice::ble::Connection;

use crate::ble::server::BridgeServer;
use crate::core::protocol::{NotifyChannel, MAX_WRITE_LEN};
use crate::core::transport::{Transport, TransportError};

/// Raised whenever the device should become connectable
pub static ADVERTISE: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Transport bound to one connection
pub struct GattTransport<'a> {
    server: &'a BridgeServer,
    conn: &'a Connection,
}

impl<'a> GattTransport<'a> {
    pub fn new(server: &'a BridgeServer, conn: &'a Connection) -> Self {
        Self { server, conn }
    }
}

impl Transport for GattTransport<'_> {
    fn notify(&mut self, channel: NotifyChannel, payload: &[u8]) -> Result<(), TransportError> {
        if self.conn.handle().is_none() {
            return Err(TransportError::NotConnected);
        }
        if payload.len() > MAX_WRITE_LEN {
            return Err(TransportError::PayloadTooLarge);
        }
        if !self.server.is_subscribed(channel) {
            return Err(TransportError::NotSubscribed);
        }

        gatt_server::notify_value(self.conn, self.server.value_handle(channel), payload).map_err(|e| {
            debug!("BLE: Notify on {} failed: {:?}", channel, defmt::Debug2Format(&e));
            TransportError::NotifyFailed
        })
    }

    fn enable_notifications(&mut self) {
        self.server.clear_subscriptions();

        // Fresh system attributes: every CCCD starts disabled until the peer writes it
        if let Err(e) = gatt_server::set_sys_attrs(self.conn, None) {
            warn!("BLE: Failed to initialize system attributes: {:?}", defmt::Debug2Format(&e));
        }
    }

    fn resume_advertising(&mut self) {
        ADVERTISE.signal(());
    }
}
