//! Common test utilities and setup for embedded tests
//!
//! This module provides shared functionality for all defmt-test based tests:
//! - Critical section implementation and global logger
//! - Heap for the property tests
//! - Scripted radio and recording transport doubles

#![allow(dead_code)]

// Re-export commonly used items for tests (except conflicting macros)
pub use defmt_rtt as _; // global logger
// Use nrf-softdevice which provides both interrupt vectors and critical section
pub use nrf_softdevice as _;
pub use panic_probe as _; // panic handler
pub use {embassy_nrf as _, embassy_sync as _, embassy_time as _};

// Global allocator for proptest (required for alloc feature in no_std)
pub extern crate alloc;
use core::sync::atomic::{AtomicBool, Ordering};

pub use embedded_alloc::LlffHeap as Heap;
use heapless::{String, Vec};
use subghz_ble_bridge::core::protocol::{NotifyChannel, MAX_NOTIFY_LEN};
use subghz_ble_bridge::core::transport::{Transport, TransportError};
use subghz_ble_bridge::radio::{Radio, RadioError};

#[global_allocator]
pub static HEAP: Heap = Heap::empty();

// Define the global allocator backing store - 8KB heap for the property tests
pub static mut HEAP_MEM: [u8; 8192] = [0; 8192];

// Global flag to ensure heap is only initialized once
static HEAP_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Ensure heap is initialized exactly once
pub fn ensure_heap_initialized() {
    if !HEAP_INITIALIZED.swap(true, Ordering::Relaxed) {
        unsafe {
            let ptr = core::ptr::addr_of_mut!(HEAP_MEM) as usize;
            HEAP.init(ptr, 8192);
        }
    }
}

/// Radio double: records every call and answers with a scripted result
pub struct MockRadio {
    pub frequency_calls: Vec<f32, 16>,
    pub ook_calls: Vec<bool, 16>,
    pub frequency_result: Result<(), RadioError>,
    pub ook_result: Result<(), RadioError>,
}

impl MockRadio {
    pub fn new() -> Self {
        Self {
            frequency_calls: Vec::new(),
            ook_calls: Vec::new(),
            frequency_result: Ok(()),
            ook_result: Ok(()),
        }
    }

    /// Radio whose frequency changes always fail with `err`
    pub fn rejecting_frequency(err: RadioError) -> Self {
        Self {
            frequency_result: Err(err),
            ..Self::new()
        }
    }

    /// Total number of driver calls
    pub fn call_count(&self) -> usize {
        self.frequency_calls.len() + self.ook_calls.len()
    }
}

impl Radio for MockRadio {
    fn set_frequency(&mut self, mhz: f32) -> Result<(), RadioError> {
        self.frequency_calls.push(mhz).unwrap();
        self.frequency_result
    }

    fn set_ook(&mut self, enabled: bool) -> Result<(), RadioError> {
        self.ook_calls.push(enabled).unwrap();
        self.ook_result
    }
}

/// Transport double: records notifications and adapter requests
pub struct MockTransport {
    pub sent: Vec<(NotifyChannel, String<MAX_NOTIFY_LEN>), 32>,
    pub notifications_enabled: u32,
    pub advertising_resumed: u32,
    /// When set, every notify fails with this error and nothing is recorded
    pub fail_with: Option<TransportError>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            sent: Vec::new(),
            notifications_enabled: 0,
            advertising_resumed: 0,
            fail_with: None,
        }
    }

    /// Number of notifications delivered on `channel`
    pub fn count(&self, channel: NotifyChannel) -> usize {
        self.sent.iter().filter(|(c, _)| *c == channel).count()
    }

    /// Text of the last notification delivered on `channel`
    pub fn last(&self, channel: NotifyChannel) -> Option<&str> {
        self.sent
            .iter()
            .rev()
            .find(|(c, _)| *c == channel)
            .map(|(_, text)| text.as_str())
    }
}

impl Transport for MockTransport {
    fn notify(&mut self, channel: NotifyChannel, payload: &[u8]) -> Result<(), TransportError> {
        if let Some(err) = self.fail_with {
            return Err(err);
        }
        let text = core::str::from_utf8(payload).unwrap();
        let mut owned = String::new();
        owned.push_str(text).unwrap();
        self.sent.push((channel, owned)).unwrap();
        Ok(())
    }

    fn enable_notifications(&mut self) {
        self.notifications_enabled += 1;
    }

    fn resume_advertising(&mut self) {
        self.advertising_resumed += 1;
    }
}
