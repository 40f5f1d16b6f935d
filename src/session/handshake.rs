//! Handshake Session
//!
//! NotStarted -> Completed on the first non-empty handshake write. Completed
//! is terminal for the session; only an explicit [`HandshakeSession::reset`]
//! (disconnect policy) brings it back.

use defmt::{debug, info, Format};

use crate::core::protocol::HANDSHAKE_RESPONSE;

/// Handshake progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Format)]
pub enum HandshakeState {
    NotStarted,
    Completed,
}

/// Tracks whether the peer has completed the initial handshake
#[derive(Debug, Format)]
pub struct HandshakeSession {
    state: HandshakeState,
}

impl HandshakeSession {
    pub const fn new() -> Self {
        Self {
            state: HandshakeState::NotStarted,
        }
    }

    /// Handle a handshake write.
    ///
    /// Every non-empty payload yields the fixed response, whatever the state.
    /// An empty payload changes nothing and yields no response.
    pub fn on_handshake_received(&mut self, payload: &[u8]) -> Option<&'static str> {
        if payload.is_empty() {
            debug!("HANDSHAKE: Ignoring empty handshake write");
            return None;
        }

        if self.state == HandshakeState::NotStarted {
            info!("HANDSHAKE: Completed ({} byte payload)", payload.len());
            self.state = HandshakeState::Completed;
        } else {
            debug!("HANDSHAKE: Repeated handshake, answering again");
        }

        Some(HANDSHAKE_RESPONSE)
    }

    pub fn state(&self) -> HandshakeState {
        self.state
    }

    pub fn is_completed(&self) -> bool {
        self.state == HandshakeState::Completed
    }

    /// Forget the handshake
    pub fn reset(&mut self) {
        self.state = HandshakeState::NotStarted;
    }
}

impl Default for HandshakeSession {
    fn default() -> Self {
        Self::new()
    }
}
