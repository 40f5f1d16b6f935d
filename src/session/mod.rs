//! Peer Session Management
//!
//! Per-connection protocol state: the handshake, the single-slot message
//! exchange and the attachment status, bundled with the radio into one
//! owned [`bridge::Bridge`] context that every channel handler receives.

pub mod bridge;
pub mod connection;
pub mod exchange;
pub mod handshake;
