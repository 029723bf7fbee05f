//! ESL Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the display driver and firmware
//! are written against, so the same driver code runs on any chip (or on a
//! host-side mock in tests).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (esl-firmware)             │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  esl-hal (this crate - traits)          │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  embassy-rp   │       │  test mocks   │
//! │  adapters     │       │  (host)       │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`spi::SpiBus`] - Write-only SPI transmission
//! - [`delay::DelayMs`] - Blocking millisecond delays

#![no_std]
#![deny(unsafe_code)]

pub mod delay;
pub mod gpio;
pub mod spi;

// Re-export key traits at crate root for convenience
pub use delay::DelayMs;
pub use gpio::{InputPin, OutputPin};
pub use spi::SpiBus;
