#![no_std]
#![no_main]

mod common;

use subghz_ble_bridge::core::protocol::HANDSHAKE_RESPONSE;
use subghz_ble_bridge::session::handshake::{HandshakeSession, HandshakeState};

#[defmt_test::tests]
mod tests {
    use defmt::{assert, assert_eq};

    use super::*;

    #[test]
    fn test_initial_state() {
        let session = HandshakeSession::new();
        assert_eq!(session.state(), HandshakeState::NotStarted);
        assert!(!session.is_completed());
    }

    #[test]
    fn test_handshake_completes() {
        let mut session = HandshakeSession::new();

        assert_eq!(session.on_handshake_received(b"hello"), Some(HANDSHAKE_RESPONSE));
        assert_eq!(session.state(), HandshakeState::Completed);
    }

    #[test]
    fn test_repeated_handshake_answers_each_time() {
        let mut session = HandshakeSession::new();

        assert_eq!(session.on_handshake_received(b"first"), Some("Handshake_OK"));
        assert_eq!(session.on_handshake_received(b"second"), Some("Handshake_OK"));
        assert_eq!(session.state(), HandshakeState::Completed);
    }

    #[test]
    fn test_empty_handshake_ignored() {
        let mut session = HandshakeSession::new();

        assert_eq!(session.on_handshake_received(&[]), None);
        assert_eq!(session.state(), HandshakeState::NotStarted);

        session.on_handshake_received(&[0x00]);
        assert_eq!(session.on_handshake_received(&[]), None);
        assert_eq!(session.state(), HandshakeState::Completed);
    }

    #[test]
    fn test_reset() {
        let mut session = HandshakeSession::default();
        session.on_handshake_received(b"x");
        session.reset();
        assert_eq!(session.state(), HandshakeState::NotStarted);
    }
}
