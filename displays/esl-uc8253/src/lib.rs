//! UC8253 e-paper controller driver
//!
//! Implements the [`esl_core::traits::Panel`] contract for the 240x416
//! UC8253 glass on the shelf-label tag, over the write-only SPI and GPIO
//! traits from `esl-hal`. The driver owns the on-glass shadow frame needed
//! for differential refresh.

#![no_std]
#![deny(unsafe_code)]

pub mod cmd;
mod driver;

pub use driver::{PanelError, Uc8253, FRAME_BYTES, HEIGHT, WIDTH, WIDTH_BYTES};
