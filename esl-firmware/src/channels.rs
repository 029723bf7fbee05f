//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! The panel task lives on core 1, so both channels use the
//! critical-section mutex, which is sound across cores.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use esl_protocol::{Fragment, TagMessage};

/// Channel capacity for decoded fragments waiting on the panel task.
/// Fragments are large; four in flight is plenty on a 115200 baud link.
const FRAGMENT_CHANNEL_SIZE: usize = 4;

/// Channel capacity for outbound messages to the host
const TX_CHANNEL_SIZE: usize = 8;

/// Decoded image fragments from the host link, consumed by the panel task
pub static FRAGMENT_CHANNEL: Channel<CriticalSectionRawMutex, Fragment, FRAGMENT_CHANNEL_SIZE> =
    Channel::new();

/// Outbound acks and heartbeat responses
pub static TX_CHANNEL: Channel<CriticalSectionRawMutex, TagMessage, TX_CHANNEL_SIZE> =
    Channel::new();
