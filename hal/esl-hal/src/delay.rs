//! Blocking delay abstraction
//!
//! The e-paper reset and busy-poll sequences need coarse millisecond waits.
//! Implementations should yield to other tasks where the platform allows it
//! rather than spin.

/// Blocking millisecond delay
pub trait DelayMs {
    /// Block for at least `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);
}
