//! Tag screen layout
//!
//! The panel memory is 240 pixels wide and 416 high; the tag draws in the
//! unrotated orientation, giving a logical canvas of 416x240. Asset
//! placements are fixed at compile time so a mismatched payload can be
//! rejected before anything touches the framebuffer.

use crate::gfx::{FontSize, Rotation};

/// Panel memory width in pixels
pub const PANEL_WIDTH: u16 = 240;

/// Panel memory height in pixels
pub const PANEL_HEIGHT: u16 = 416;

/// Bytes per memory row
pub const WIDTH_BYTES: usize = (PANEL_WIDTH as usize).div_ceil(8);

/// Size of one full frame in bytes
pub const FRAME_BYTES: usize = WIDTH_BYTES * PANEL_HEIGHT as usize;

/// Orientation the tag draws in
pub const TAG_ROTATION: Rotation = Rotation::Rotate0;

/// A fixed placement on the logical canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
}

impl Rect {
    /// Expected payload size for a column-serial 1-bit bitmap of this rect
    pub const fn payload_len(self) -> usize {
        self.w as usize * (self.h as usize).div_ceil(8)
    }
}

/// Where the price image lands
pub const PRICE_RECT: Rect = Rect {
    x: 272,
    y: 64,
    w: 128,
    h: 96,
};

/// Where the description image lands
pub const DESC_RECT: Rect = Rect {
    x: 16,
    y: 32,
    w: 240,
    h: 96,
};

/// Position of the device id string drawn at boot
pub const DEVICE_ID_POS: (u16, u16) = (70, 213);

/// Font the device id is drawn in
pub const DEVICE_ID_FONT: FontSize = FontSize::Size16;
