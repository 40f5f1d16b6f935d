//! Bridge Channel Protocol Definitions
//!
//! This module defines the logical channels exchanged with the peer and the
//! fixed payloads the device sends back.
//!
//! Inbound channels (peer writes):
//! - config: `KEY:VALUE;KEY:VALUE;...` UTF-8 text
//! - handshake: opaque, non-empty bytes
//! - message: opaque bytes
//!
//! Outbound channels (device notifies):
//! - log: UTF-8 status and configuration report lines
//! - handshake response: the fixed text `Handshake_OK`
//! - message ack: `ESP32 ACK: <uptime ms>`

use ::core::fmt::Write;

use defmt::Format;
use heapless::String;

/// Default ATT MTU negotiated by the SoftDevice configuration
pub const ATT_MTU: usize = 247;

/// Maximum payload of a single characteristic write (ATT_MTU - 3 byte header)
pub const MAX_WRITE_LEN: usize = ATT_MTU - 3;

/// Maximum length of a notification line built by the bridge
pub const MAX_NOTIFY_LEN: usize = 96;

/// Fixed response pushed for every non-empty handshake write
pub const HANDSHAKE_RESPONSE: &str = "Handshake_OK";

/// Prefix of every message acknowledgment
pub const ACK_PREFIX: &str = "ESP32 ACK: ";

/// Prefix of the periodic status line
pub const STATUS_PREFIX: &str = "Log data from bridge: ";

/// Text buffer used for outbound notifications
pub type NotifyText = String<MAX_NOTIFY_LEN>;

/// Channels the peer writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Format)]
pub enum WriteChannel {
    Config,
    Handshake,
    Message,
}

/// Channels the device pushes notifications on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Format)]
pub enum NotifyChannel {
    Log,
    HandshakeResponse,
    MessageAck,
}

impl NotifyChannel {
    /// All notify channels, in characteristic registration order
    pub const ALL: [NotifyChannel; 3] = [
        NotifyChannel::Log,
        NotifyChannel::HandshakeResponse,
        NotifyChannel::MessageAck,
    ];

    /// Index of the channel inside [`NotifyChannel::ALL`]
    pub const fn index(self) -> usize {
        match self {
            NotifyChannel::Log => 0,
            NotifyChannel::HandshakeResponse => 1,
            NotifyChannel::MessageAck => 2,
        }
    }
}

/// Build the acknowledgment text for a message received at `uptime_ms`
pub fn ack_text(uptime_ms: u64) -> NotifyText {
    let mut text = NotifyText::new();
    // Prefix plus a u64 always fits in MAX_NOTIFY_LEN.
    let _ = write!(text, "{}{}", ACK_PREFIX, uptime_ms);
    text
}

/// Build the periodic status text emitted while a peer is attached
pub fn status_text(uptime_ms: u64) -> NotifyText {
    let mut text = NotifyText::new();
    let _ = write!(text, "{}{}", STATUS_PREFIX, uptime_ms);
    text
}

/// Service and characteristic UUIDs
///
/// The bridge uses one vendor base, `12345678-1234-5678-1234-56789abcdeXX`,
/// where only the last byte differs between attributes. The SoftDevice
/// expects 128-bit UUIDs in little-endian byte order.
pub mod uuids {
    /// Build the little-endian UUID bytes for the attribute with suffix `last`
    pub const fn bridge_uuid(last: u8) -> [u8; 16] {
        [
            last, 0xDE, 0xBC, 0x9A, 0x78, 0x56, 0x34, 0x12, 0x78, 0x56, 0x34, 0x12, 0x78, 0x56, 0x34, 0x12,
        ]
    }

    pub const SERVICE: [u8; 16] = bridge_uuid(0xF0);
    pub const CONFIG: [u8; 16] = bridge_uuid(0xF1);
    pub const LOG: [u8; 16] = bridge_uuid(0xF2);
    pub const MESSAGE: [u8; 16] = bridge_uuid(0xF3);
    pub const HANDSHAKE_RX: [u8; 16] = bridge_uuid(0xF4);
    pub const HANDSHAKE_TX: [u8; 16] = bridge_uuid(0xF5);
}
