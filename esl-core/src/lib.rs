//! Board-agnostic core logic for the ESL e-paper tag
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - 1-bit framebuffer with rotation-aware drawing primitives
//! - Bounded reassembly pool for chunked image payloads
//! - Commit barrier gating the panel update on both image assets
//! - The ingest pump tying fragments, framebuffer and panel together
//! - Panel abstraction trait and tag layout constants

#![no_std]
#![deny(unsafe_code)]

pub mod commit;
pub mod gfx;
pub mod inflight;
pub mod ingest;
pub mod layout;
pub mod traits;
