//! RP2040 adapters for the esl-hal traits
//!
//! Thin newtypes over embassy-rp peripherals so the display driver stays
//! chip-agnostic. Chip select is toggled here, per SPI transfer.

use embassy_rp::gpio::{Input, Output};
use embassy_rp::spi::{Blocking, Spi};
use embassy_time::{block_for, Duration};

use esl_uc8253::Uc8253;

/// Concrete driver type for the tag board
pub type TagPanel = Uc8253<RpSpiBus, RpInputPin, RpOutputPin, RpOutputPin, RpDelay>;

pub struct RpOutputPin(Output<'static>);

impl RpOutputPin {
    pub fn new(pin: Output<'static>) -> Self {
        Self(pin)
    }
}

impl esl_hal::OutputPin for RpOutputPin {
    fn set_high(&mut self) {
        self.0.set_high();
    }

    fn set_low(&mut self) {
        self.0.set_low();
    }
}

pub struct RpInputPin(Input<'static>);

impl RpInputPin {
    pub fn new(pin: Input<'static>) -> Self {
        Self(pin)
    }
}

impl esl_hal::InputPin for RpInputPin {
    fn is_high(&self) -> bool {
        self.0.is_high()
    }
}

/// Write-only SPI bus with software chip select
pub struct RpSpiBus {
    spi: Spi<'static, Blocking>,
    cs: Output<'static>,
}

impl RpSpiBus {
    pub fn new(spi: Spi<'static, Blocking>, cs: Output<'static>) -> Self {
        Self { spi, cs }
    }
}

impl esl_hal::SpiBus for RpSpiBus {
    type Error = embassy_rp::spi::Error;

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.cs.set_low();
        let result = self.spi.blocking_write(data);
        self.cs.set_high();
        result
    }
}

/// Blocking delay backed by the embassy time driver
pub struct RpDelay;

impl esl_hal::DelayMs for RpDelay {
    fn delay_ms(&mut self, ms: u32) {
        block_for(Duration::from_millis(u64::from(ms)));
    }
}
