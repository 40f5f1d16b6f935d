//! Message Exchange
//!
//! Single-slot store of the most recent inbound message. Every non-empty
//! write replaces the slot and produces one acknowledgment. A message is
//! acknowledged at most once: the ack poll only re-sends when the immediate
//! acknowledgment could not be delivered, and never after the peer that
//! sent the message detached.

use defmt::{debug, warn, Format};
use heapless::Vec;

use crate::core::protocol::{ack_text, NotifyText, MAX_WRITE_LEN};

/// Most recent inbound message
#[derive(Debug, Clone, Format)]
pub struct PendingMessage {
    pub payload: Vec<u8, MAX_WRITE_LEN>,
    /// Set once an acknowledgment for this message reached the transport
    pub acknowledged: bool,
}

/// Message store and acknowledgment source
#[derive(Debug, Default, Format)]
pub struct MessageExchange {
    pending: Option<PendingMessage>,
    received: u32,
}

impl MessageExchange {
    pub const fn new() -> Self {
        Self {
            pending: None,
            received: 0,
        }
    }

    /// Store a message write and build its acknowledgment.
    ///
    /// Empty payloads are a no-op and yield no acknowledgment.
    pub fn on_message_received(&mut self, payload: &[u8], uptime_ms: u64) -> Option<NotifyText> {
        if payload.is_empty() {
            debug!("MESSAGE: Ignoring empty message write");
            return None;
        }

        let kept = payload.len().min(MAX_WRITE_LEN);
        if kept < payload.len() {
            warn!("MESSAGE: Truncating {} byte message to {}", payload.len(), kept);
        }

        let mut stored = Vec::new();
        // `kept` never exceeds the slot capacity.
        let _ = stored.extend_from_slice(&payload[..kept]);

        self.pending = Some(PendingMessage {
            payload: stored,
            acknowledged: false,
        });
        self.received = self.received.wrapping_add(1);

        debug!("MESSAGE: Stored message #{} ({} bytes)", self.received, kept);
        Some(ack_text(uptime_ms))
    }

    /// Acknowledgment for the pending message if it has not been delivered yet
    pub fn pending_ack(&self, uptime_ms: u64) -> Option<NotifyText> {
        match &self.pending {
            Some(message) if !message.acknowledged => Some(ack_text(uptime_ms)),
            _ => None,
        }
    }

    /// Record that the acknowledgment of the pending message was delivered
    pub fn mark_acknowledged(&mut self) {
        if let Some(message) = self.pending.as_mut() {
            message.acknowledged = true;
        }
    }

    /// Drop an undelivered acknowledgment when its peer goes away. The
    /// message stays in the slot; the next peer never sees its ack.
    pub fn discard_pending_ack(&mut self) {
        if let Some(message) = self.pending.as_mut().filter(|message| !message.acknowledged) {
            debug!("MESSAGE: Discarding ack for {} byte message of detached peer", message.payload.len());
            message.acknowledged = true;
        }
    }

    pub fn pending(&self) -> Option<&PendingMessage> {
        self.pending.as_ref()
    }

    /// Number of non-empty messages received since boot
    pub fn received_count(&self) -> u32 {
        self.received
    }
}
