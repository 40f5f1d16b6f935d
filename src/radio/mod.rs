//! Sub-GHz Radio Contract
//!
//! The bridge drives the transceiver only through [`Radio`]. The trait covers
//! exactly what configuration commands need; modulation tables, synthesizer
//! math and the SPI register protocol stay inside the driver.

use defmt::Format;

pub mod cc1101;

/// Radio driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Format)]
pub enum RadioError {
    /// SPI transaction with the chip failed
    Spi,
    /// The chip did not answer with a known version
    ChipNotFound,
    /// Requested frequency is outside every supported band
    InvalidFrequency,
}

impl RadioError {
    /// Signed driver status code reported alongside a rejection
    pub fn code(self) -> i16 {
        match self {
            RadioError::Spi => -1,
            RadioError::ChipNotFound => -2,
            RadioError::InvalidFrequency => -12,
        }
    }
}

/// Signal encoding used by the transceiver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Format)]
pub enum Modulation {
    /// On-off keying
    Ook,
    /// Frequency-shift keying
    Fsk,
}

/// Intended transmit/receive function of the radio (informational only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Format)]
pub enum Role {
    Unset,
    Transmitter,
    Receiver,
}

/// Operations the bridge needs from the radio driver.
///
/// Calls are synchronous and expected to complete in bounded time.
pub trait Radio {
    /// Tune the carrier to `mhz`
    fn set_frequency(&mut self, mhz: f32) -> Result<(), RadioError>;

    /// Select OOK (`true`) or FSK (`false`) modulation
    fn set_ook(&mut self, enabled: bool) -> Result<(), RadioError>;
}

impl<R: Radio + ?Sized> Radio for &mut R {
    fn set_frequency(&mut self, mhz: f32) -> Result<(), RadioError> {
        (**self).set_frequency(mhz)
    }

    fn set_ook(&mut self, enabled: bool) -> Result<(), RadioError> {
        (**self).set_ook(enabled)
    }
}
