//! UC8253 panel driver
//!
//! Differential-refresh controller: every push transfers the previous frame
//! into the OLD data register and the new frame into NEW, so only changed
//! pixels flicker on partial refresh. The driver keeps the shadow copy; the
//! caller only ever supplies the new frame.

use esl_core::traits::{Panel, RefreshMode};
use esl_hal::{DelayMs, InputPin, OutputPin, SpiBus};

use crate::cmd::{Cmd, Flag};

/// Panel memory width in pixels
pub const WIDTH: u16 = 240;

/// Panel memory height in pixels
pub const HEIGHT: u16 = 416;

/// Bytes per memory row
pub const WIDTH_BYTES: usize = (WIDTH as usize).div_ceil(8);

/// Size of one full frame in bytes
pub const FRAME_BYTES: usize = WIDTH_BYTES * HEIGHT as usize;

/// Poll interval for the busy line
const BUSY_POLL_MS: u32 = 50;

/// Give up waiting for busy after this long; a full refresh takes a few
/// seconds, so 30s means the panel is gone
const BUSY_TIMEOUT_MS: u32 = 30_000;

/// Driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelError<E> {
    /// SPI transfer failed
    Bus(E),
    /// The busy line never released
    BusyTimeout,
    /// Operation needs an initialized panel but it is in deep sleep
    Asleep,
    /// Pushed frame is not exactly one full frame
    FrameSize,
}

impl<E> From<E> for PanelError<E> {
    fn from(e: E) -> Self {
        PanelError::Bus(e)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DriverState {
    /// Powered but not configured; only init is valid
    Reset,
    /// Initialized, accepting data and refreshes
    Ready,
    /// In deep sleep; needs init (with its hardware reset) to wake
    Asleep,
}

/// UC8253 driver over caller-provided bus and pins
pub struct Uc8253<SPI, BSY, DC, RST, DLY> {
    spi: SPI,
    busy: BSY,
    dc: DC,
    rst: RST,
    delay: DLY,
    state: DriverState,
    /// Shadow of the frame currently on glass, sent as OLD data each push.
    /// A freshly reset panel shows white.
    old_frame: [u8; FRAME_BYTES],
}

impl<SPI, BSY, DC, RST, DLY> Uc8253<SPI, BSY, DC, RST, DLY>
where
    SPI: SpiBus,
    BSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DLY: DelayMs,
{
    pub fn new(spi: SPI, busy: BSY, dc: DC, rst: RST, delay: DLY) -> Self {
        Self {
            spi,
            busy,
            dc,
            rst,
            delay,
            state: DriverState::Reset,
            old_frame: [0xFF; FRAME_BYTES],
        }
    }

    fn cmd(&mut self, command: u8) -> Result<(), PanelError<SPI::Error>> {
        self.dc.set_low();
        self.spi.write(&[command])?;
        Ok(())
    }

    fn data(&mut self, data: &[u8]) -> Result<(), PanelError<SPI::Error>> {
        self.dc.set_high();
        self.spi.write(data)?;
        Ok(())
    }

    fn cmd_with_data(&mut self, command: u8, data: &[u8]) -> Result<(), PanelError<SPI::Error>> {
        self.cmd(command)?;
        self.data(data)
    }

    /// Block until the busy line releases
    ///
    /// The UC8253 busy line is active-low: low means working. Bounded so a
    /// disconnected panel fails instead of hanging the panel task forever.
    fn wait_busy(&mut self) -> Result<(), PanelError<SPI::Error>> {
        let mut waited = 0u32;
        while self.busy.is_low() {
            if waited >= BUSY_TIMEOUT_MS {
                return Err(PanelError::BusyTimeout);
            }
            self.delay.delay_ms(BUSY_POLL_MS);
            waited += BUSY_POLL_MS;
        }
        Ok(())
    }

    /// Hardware reset pulse, then wait for the controller to come up
    fn reset(&mut self) -> Result<(), PanelError<SPI::Error>> {
        self.rst.set_low();
        self.delay.delay_ms(20);
        self.rst.set_high();
        self.delay.delay_ms(20);
        self.wait_busy()
    }

    fn guard_awake(&self) -> Result<(), PanelError<SPI::Error>> {
        match self.state {
            DriverState::Ready => Ok(()),
            DriverState::Reset | DriverState::Asleep => Err(PanelError::Asleep),
        }
    }

    /// Transfer both data registers: shadow into OLD, `frame` into NEW
    fn transfer_frame(&mut self, frame: &[u8]) -> Result<(), PanelError<SPI::Error>> {
        self.cmd(Cmd::DATA_START_OLD)?;
        self.dc.set_high();
        self.spi.write(&self.old_frame)?;

        self.cmd(Cmd::DATA_START_NEW)?;
        self.data(frame)?;
        self.old_frame.copy_from_slice(frame);
        Ok(())
    }

    fn power_on_and_refresh(&mut self) -> Result<(), PanelError<SPI::Error>> {
        self.cmd(Cmd::POWER_ON)?;
        self.wait_busy()?;
        self.cmd(Cmd::DISPLAY_REFRESH)?;
        self.wait_busy()
    }
}

impl<SPI, BSY, DC, RST, DLY> Panel for Uc8253<SPI, BSY, DC, RST, DLY>
where
    SPI: SpiBus,
    BSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DLY: DelayMs,
{
    type Error = PanelError<SPI::Error>;

    /// Reset and configure the controller
    ///
    /// Full mode runs with the OTP waveform; Partial and Fast force a
    /// temperature value that selects their LUT, and float the border so it
    /// does not flash on every update.
    fn init(&mut self, mode: RefreshMode) -> Result<(), Self::Error> {
        self.reset()?;
        self.wait_busy()?;

        self.cmd_with_data(Cmd::PANEL_SETTING, &[Flag::PANEL_DEFAULT])?;

        match mode {
            RefreshMode::Full => {}
            RefreshMode::Partial | RefreshMode::Fast => {
                let temp = if mode == RefreshMode::Partial {
                    Flag::TEMP_PARTIAL
                } else {
                    Flag::TEMP_FAST
                };
                self.cmd_with_data(Cmd::CASCADE_SETTING, &[Flag::CASCADE_TSFIX])?;
                self.cmd_with_data(Cmd::FORCE_TEMPERATURE, &[temp])?;
                self.cmd_with_data(Cmd::VCOM_INTERVAL, &[Flag::VCOM_DEFAULT])?;
                self.wait_busy()?;
            }
        }

        self.state = DriverState::Ready;
        Ok(())
    }

    fn push(&mut self, frame: &[u8]) -> Result<(), Self::Error> {
        self.guard_awake()?;
        if frame.len() != FRAME_BYTES {
            return Err(PanelError::FrameSize);
        }
        self.transfer_frame(frame)
    }

    fn refresh(&mut self) -> Result<(), Self::Error> {
        self.guard_awake()?;
        self.power_on_and_refresh()
    }

    /// Blank the panel to white and display it
    fn clear(&mut self) -> Result<(), Self::Error> {
        self.guard_awake()?;

        self.cmd(Cmd::DATA_START_OLD)?;
        self.dc.set_high();
        self.spi.write(&self.old_frame)?;

        self.old_frame.fill(0xFF);
        self.cmd(Cmd::DATA_START_NEW)?;
        self.dc.set_high();
        self.spi.write(&self.old_frame)?;

        self.power_on_and_refresh()
    }

    /// Power off and enter deep sleep
    ///
    /// Idempotent: sleeping again is a no-op, not an error.
    fn deep_sleep(&mut self) -> Result<(), Self::Error> {
        if self.state == DriverState::Asleep {
            return Ok(());
        }
        self.cmd(Cmd::POWER_OFF)?;
        self.wait_busy()?;
        self.cmd_with_data(Cmd::DEEP_SLEEP, &[Flag::DEEP_SLEEP_CHECK])?;
        self.state = DriverState::Asleep;
        Ok(())
    }
}
