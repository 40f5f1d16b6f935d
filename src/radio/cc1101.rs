//! CC1101 Driver Adapter
//!
//! Minimal register-level access to a TI CC1101 sub-GHz transceiver, enough
//! to implement [`Radio`]. The SPI bus is abstracted behind [`RegisterBus`]
//! so the adapter does not depend on a particular SPIM instance.
//!
//! Header byte layout: `[R/W:1][BURST:1][ADDR:6]`

use defmt::{debug, info, warn};

use super::{Radio, RadioError};

/// Crystal frequency of the common CC1101 modules (Hz)
pub const XOSC_HZ: u64 = 26_000_000;

/// Supported carrier bands (MHz, inclusive)
pub const BANDS_MHZ: [(f32, f32); 3] = [(300.0, 348.0), (387.0, 464.0), (779.0, 928.0)];

// Header flags
const READ: u8 = 0x80;
const BURST: u8 = 0x40;

// Configuration registers
const REG_FREQ2: u8 = 0x0D;
const REG_FREQ1: u8 = 0x0E;
const REG_FREQ0: u8 = 0x0F;
const REG_MDMCFG2: u8 = 0x12;

// Status registers (read with the burst bit set)
const REG_VERSION: u8 = 0x31;

// Command strobes
const STROBE_SRES: u8 = 0x30;
const STROBE_SCAL: u8 = 0x33;
const STROBE_SIDLE: u8 = 0x36;
const STROBE_SNOP: u8 = 0x3D;

/// Status byte bit that stays high until the crystal is stable
const CHIP_RDYN: u8 = 0x80;

/// Status polls after SRES before the chip is considered absent
const READY_POLLS: usize = 100;

/// MDMCFG2 MOD_FORMAT field (bits 6:4)
const MOD_FORMAT_MASK: u8 = 0b0111_0000;
const MOD_FORMAT_2FSK: u8 = 0b0000_0000;
const MOD_FORMAT_ASK_OOK: u8 = 0b0011_0000;

/// Chip versions reported by genuine parts and common clones
const KNOWN_VERSIONS: [u8; 3] = [0x14, 0x04, 0x17];

/// Number of version reads before giving up on the chip
const PROBE_ATTEMPTS: usize = 10;

/// Full-duplex SPI transaction with chip select asserted for its duration
pub trait RegisterBus {
    fn transfer(&mut self, buf: &mut [u8]) -> Result<(), RadioError>;
}

impl<F> RegisterBus for F
where
    F: FnMut(&mut [u8]) -> Result<(), RadioError>,
{
    fn transfer(&mut self, buf: &mut [u8]) -> Result<(), RadioError> {
        self(buf)
    }
}

/// Compute the 24-bit FREQ register word for a carrier of `mhz`
pub fn frequency_word(mhz: f32) -> u32 {
    let hz = (mhz as f64 * 1_000_000.0) as u64;
    ((hz << 16) / XOSC_HZ) as u32
}

/// Whether `mhz` falls inside one of the CC1101 bands
pub fn in_supported_band(mhz: f32) -> bool {
    BANDS_MHZ.iter().any(|&(low, high)| mhz >= low && mhz <= high)
}

/// CC1101 transceiver
pub struct Cc1101<B: RegisterBus> {
    bus: B,
}

impl<B: RegisterBus> Cc1101<B> {
    /// Create a driver without touching the chip
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    /// Reset the chip and verify it answers with a known version
    pub fn begin(&mut self) -> Result<u8, RadioError> {
        self.strobe(STROBE_SRES)?;
        self.wait_ready()?;

        for attempt in 0..PROBE_ATTEMPTS {
            let version = self.read_status(REG_VERSION)?;
            if KNOWN_VERSIONS.contains(&version) {
                info!("RADIO: CC1101 found, version 0x{:02X}", version);
                return Ok(version);
            }
            debug!("RADIO: Unexpected version 0x{:02X} (attempt {})", version, attempt);
        }

        warn!("RADIO: No CC1101 answered on the bus");
        Err(RadioError::ChipNotFound)
    }

    /// Give the bus back
    pub fn release(self) -> B {
        self.bus
    }

    /// Poll the status byte until CHIP_RDYn clears
    fn wait_ready(&mut self) -> Result<(), RadioError> {
        for _ in 0..READY_POLLS {
            if self.strobe(STROBE_SNOP)? & CHIP_RDYN == 0 {
                return Ok(());
            }
        }

        warn!("RADIO: CC1101 never left reset");
        Err(RadioError::ChipNotFound)
    }

    /// Send a command strobe, returning the chip status byte
    fn strobe(&mut self, strobe: u8) -> Result<u8, RadioError> {
        let mut buf = [strobe];
        self.bus.transfer(&mut buf)?;
        Ok(buf[0])
    }

    fn write_register(&mut self, addr: u8, value: u8) -> Result<(), RadioError> {
        let mut buf = [addr, value];
        self.bus.transfer(&mut buf)
    }

    fn read_register(&mut self, addr: u8) -> Result<u8, RadioError> {
        let mut buf = [addr | READ, 0];
        self.bus.transfer(&mut buf)?;
        Ok(buf[1])
    }

    fn read_status(&mut self, addr: u8) -> Result<u8, RadioError> {
        self.read_register(addr | BURST)
    }
}

impl<B: RegisterBus> Radio for Cc1101<B> {
    fn set_frequency(&mut self, mhz: f32) -> Result<(), RadioError> {
        if !in_supported_band(mhz) {
            return Err(RadioError::InvalidFrequency);
        }

        let word = frequency_word(mhz);
        self.strobe(STROBE_SIDLE)?;
        self.write_register(REG_FREQ2, (word >> 16) as u8)?;
        self.write_register(REG_FREQ1, (word >> 8) as u8)?;
        self.write_register(REG_FREQ0, word as u8)?;
        self.strobe(STROBE_SCAL)?;

        debug!("RADIO: FREQ word 0x{:06X} for {} MHz", word, mhz);
        Ok(())
    }

    fn set_ook(&mut self, enabled: bool) -> Result<(), RadioError> {
        let format = if enabled { MOD_FORMAT_ASK_OOK } else { MOD_FORMAT_2FSK };

        let mdmcfg2 = self.read_register(REG_MDMCFG2)?;
        self.write_register(REG_MDMCFG2, (mdmcfg2 & !MOD_FORMAT_MASK) | format)?;

        debug!("RADIO: MDMCFG2 0x{:02X} -> MOD_FORMAT 0x{:02X}", mdmcfg2, format);
        Ok(())
    }
}
