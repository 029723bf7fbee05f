//! ESL Host Link Protocol
//!
//! This crate defines the serial protocol between the host (the system that
//! renders price/description images) and the e-paper tag. Image payloads are
//! larger than a single transfer, so the host streams them as fragments; the
//! tag reassembles them before touching the panel.
//!
//! # Protocol Overview
//!
//! All messages use a simple binary frame format:
//! ```text
//! ┌───────┬────────────┬──────┬─────────────┬──────────┐
//! │ START │ LENGTH(LE) │ TYPE │ PAYLOAD     │ CHECKSUM │
//! │ 1B    │ 2B         │ 1B   │ 0–600B      │ 1B       │
//! └───────┴────────────┴──────┴─────────────┴──────────┘
//! ```
//!
//! The tag is a "dumb panel": it reassembles fragments and drives the
//! display. Which image goes where is decided by the topic string carried in
//! the first fragment of each message.

#![no_std]
#![deny(unsafe_code)]

pub mod frame;
pub mod messages;

pub use frame::{Frame, FrameError, FrameParser, FRAME_START, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE};
pub use messages::{Fragment, HostMessage, TagMessage, MAX_CHUNK, MAX_TOPIC_LEN};
