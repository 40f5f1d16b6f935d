//! Transport Contract
//!
//! The bridge core never talks to the BLE stack directly. Everything it needs
//! from the link layer goes through [`Transport`]: pushing notifications,
//! re-arming notifications for a fresh peer and resuming advertising once the
//! peer goes away.

use defmt::Format;

use super::protocol::NotifyChannel;

/// Transport errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Format)]
pub enum TransportError {
    /// No peer is attached
    NotConnected,
    /// The peer has not enabled notifications on the channel
    NotSubscribed,
    /// Payload exceeds what the link can carry in one notification
    PayloadTooLarge,
    /// The BLE stack refused the notification
    NotifyFailed,
}

/// Link-layer operations the bridge core relies on
pub trait Transport {
    /// Push `payload` to the peer on `channel`. Delivery is fire-and-forget.
    fn notify(&mut self, channel: NotifyChannel, payload: &[u8]) -> Result<(), TransportError>;

    /// (Re)enable notifications for a newly attached peer
    fn enable_notifications(&mut self);

    /// Make the device connectable again after the peer detached
    fn resume_advertising(&mut self);
}
