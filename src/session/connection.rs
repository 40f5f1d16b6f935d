//! Connection State
//!
//! Tracks whether a peer is attached. Attachment re-arms notifications on
//! the transport; detachment makes the device connectable again.

use defmt::{info, Format};

use crate::core::transport::Transport;

/// Peer attachment status
#[derive(Debug, Default, Format)]
pub struct ConnectionState {
    connected: bool,
    connections: u32,
}

impl ConnectionState {
    pub const fn new() -> Self {
        Self {
            connected: false,
            connections: 0,
        }
    }

    pub fn on_connect(&mut self, transport: &mut dyn Transport) {
        self.connected = true;
        self.connections = self.connections.wrapping_add(1);
        info!("CONNECTION: Peer attached (connection #{})", self.connections);
        transport.enable_notifications();
    }

    pub fn on_disconnect(&mut self, transport: &mut dyn Transport) {
        self.connected = false;
        info!("CONNECTION: Peer detached, resuming advertising");
        transport.resume_advertising();
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Number of connections accepted since boot
    pub fn connection_count(&self) -> u32 {
        self.connections
    }
}
