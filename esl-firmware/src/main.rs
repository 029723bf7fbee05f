//! ESL - Electronic Shelf Label Firmware
//!
//! Main firmware binary for RP2040-based e-paper price tags. The tag
//! receives chunked 1bpp images over a framed UART link, reassembles them,
//! and drives a UC8253 panel with differential updates. The panel spends
//! almost all of its life in deep sleep.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::{Executor, Spawner};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::multicore::{spawn_core1, Stack};
use embassy_rp::peripherals::UART0;
use embassy_rp::spi::{Config as SpiConfig, Spi};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::Timer;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use esl_uc8253::{Uc8253, FRAME_BYTES};

mod channels;
mod font;
mod hal;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 1024]> = StaticCell::new();

// Framebuffer storage, owned by the panel task
static FRAME: StaticCell<[u8; FRAME_BYTES]> = StaticCell::new();

// Core 1 runs the panel executor. The driver blocks through resets and
// busy-waits, so it cannot share an executor with the host link tasks; the
// stack must also fit the driver (and its shadow frame) while it is moved in.
static mut CORE1_STACK: Stack<20480> = Stack::new();
static EXECUTOR1: StaticCell<Executor> = StaticCell::new();

/// Device identity shown on the boot screen for pairing
/// TODO: read from flash OTP once the provisioning flow lands
const DEVICE_ID: &str = "3C71BF9D2A10";

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("ESL firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Host link UART (115200 8N1 default)
    let uart_config = UartConfig::default();
    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 1024]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized for host link");

    // Panel power rail switch; the panel ground is gated to cut leakage
    // while the tag sleeps
    let mut panel_power = Output::new(p.PIN_22, Level::Low);
    panel_power.set_high();

    // Write-only SPI to the UC8253
    let mut spi_config = SpiConfig::default();
    spi_config.frequency = esl_hal::spi::SpiConfig::default().frequency;
    let spi = Spi::new_blocking_txonly(p.SPI0, p.PIN_18, p.PIN_19, spi_config);

    let cs = Output::new(p.PIN_17, Level::High);
    let dc = hal::RpOutputPin::new(Output::new(p.PIN_20, Level::Low));
    let rst = hal::RpOutputPin::new(Output::new(p.PIN_21, Level::High));
    let busy = hal::RpInputPin::new(Input::new(p.PIN_16, Pull::Up));

    let panel = Uc8253::new(hal::RpSpiBus::new(spi, cs), busy, dc, rst, hal::RpDelay);
    let frame = FRAME.init([0xFF; FRAME_BYTES]);

    info!("Panel driver initialized");

    // Panel work goes to core 1 so its blocking refresh waits never starve
    // the UART tasks on this core
    spawn_core1(
        p.CORE1,
        unsafe { &mut *core::ptr::addr_of_mut!(CORE1_STACK) },
        move || {
            let executor1 = EXECUTOR1.init(Executor::new());
            executor1.run(|spawner| spawner.spawn(tasks::panel_task(panel, frame)).unwrap());
        },
    );

    spawner.spawn(tasks::net_rx_task(rx)).unwrap();
    spawner.spawn(tasks::net_tx_task(tx)).unwrap();

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
