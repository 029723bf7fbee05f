//! 1-bit framebuffer and drawing primitives
//!
//! The canvas is packed MSB-first, `ceil(width/8)` bytes per row - the exact
//! layout the panel controller expects, so the buffer can be pushed without
//! a conversion pass.

pub mod font;
mod framebuffer;

pub use font::{FontSize, GlyphSource};
pub use framebuffer::Framebuffer;

/// Pixel color on a 1-bit panel
///
/// White is the set-bit state; a freshly reset e-paper panel shows white.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Color {
    Black,
    White,
}

impl Color {
    /// The byte value that fills a whole row with this color
    pub const fn fill_byte(self) -> u8 {
        match self {
            Color::Black => 0x00,
            Color::White => 0xFF,
        }
    }

    /// The opposite color
    pub const fn inverse(self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }
}

/// Display rotation setting
///
/// Rotation is applied per pixel when drawing; the underlying buffer always
/// stays in physical (memory) orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
    Rotate0,
    Rotate90,
    Rotate180,
    Rotate270,
}
