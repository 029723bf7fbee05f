//! Panel driver trait
//!
//! Abstracts the e-paper controller so the ingest pump and firmware tasks
//! can be tested against a mock. The error type is left to the driver; it
//! usually wraps a bus error plus panel-specific failures.

/// Waveform selection for panel initialization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RefreshMode {
    /// Full-screen refresh with the slow, artifact-free waveform
    Full,
    /// Differential refresh; only changed pixels flicker
    Partial,
    /// Full refresh with the fast waveform
    Fast,
}

/// Trait for the e-paper panel controller
///
/// The expected sequence is `init`, one or more `push`es, `refresh`, then
/// `deep_sleep`. A sleeping panel must be re-initialized before further use.
pub trait Panel {
    type Error;

    /// Wake and configure the controller for the given waveform
    fn init(&mut self, mode: RefreshMode) -> Result<(), Self::Error>;

    /// Transfer a full frame into controller RAM without displaying it
    fn push(&mut self, frame: &[u8]) -> Result<(), Self::Error>;

    /// Display the pushed frame; blocks until the panel is idle again
    fn refresh(&mut self) -> Result<(), Self::Error>;

    /// Blank the panel to white and display it
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Power down into the lowest-power state
    fn deep_sleep(&mut self) -> Result<(), Self::Error>;
}
