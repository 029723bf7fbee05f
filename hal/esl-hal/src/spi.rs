//! SPI bus abstractions
//!
//! The e-paper controller is write-only (no MISO line on the tag board),
//! so the trait covers transmission only.

/// Write-only SPI bus master
///
/// The display driver holds the bus exclusively; chip select is managed by
/// the implementation.
pub trait SpiBus {
    /// Error type for SPI operations
    type Error;

    /// Write data without reading
    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error>;
}

/// SPI configuration
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
    /// SPI mode (clock polarity and phase)
    pub mode: Mode,
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self {
            // UC8253 is specified up to 10 MHz; 2 MHz matches the tag board
            frequency: 2_000_000,
            mode: Mode::Mode0,
        }
    }
}

/// SPI mode (combined polarity and phase)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Mode 0: CPOL=0, CPHA=0
    Mode0,
    /// Mode 1: CPOL=0, CPHA=1
    Mode1,
    /// Mode 2: CPOL=1, CPHA=0
    Mode2,
    /// Mode 3: CPOL=1, CPHA=1
    Mode3,
}
