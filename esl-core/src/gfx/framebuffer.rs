//! Rotation-aware 1-bit framebuffer
//!
//! The engine borrows caller-owned storage and never reallocates; every
//! drawing call resolves logical coordinates through the rotation mapping to
//! a single bit in the packed buffer.

use super::font::{FontSize, GlyphSource};
use super::{Color, Rotation};

/// 1-bit-per-pixel canvas over caller-owned storage
///
/// `width`/`height` passed to [`Framebuffer::new`] are the physical memory
/// dimensions of the panel (pre-rotation); the logical drawing dimensions
/// are swapped for 0°/180°.
pub struct Framebuffer<'a> {
    buf: &'a mut [u8],
    width_memory: u16,
    height_memory: u16,
    width_bytes: u16,
    width: u16,
    height: u16,
    rotation: Rotation,
    background: Color,
}

impl<'a> Framebuffer<'a> {
    /// Bind the engine to caller-owned storage
    ///
    /// The buffer must hold at least `ceil(width/8) * height` bytes.
    pub fn new(
        buf: &'a mut [u8],
        width: u16,
        height: u16,
        rotation: Rotation,
        background: Color,
    ) -> Self {
        let width_bytes = width.div_ceil(8);
        assert!(
            buf.len() >= width_bytes as usize * height as usize,
            "framebuffer storage too small for panel geometry"
        );

        // Logical width/height depends on rotation
        let (w, h) = match rotation {
            Rotation::Rotate0 | Rotation::Rotate180 => (height, width),
            Rotation::Rotate90 | Rotation::Rotate270 => (width, height),
        };

        Self {
            buf,
            width_memory: width,
            height_memory: height,
            width_bytes,
            width: w,
            height: h,
            rotation,
            background,
        }
    }

    /// Logical width after rotation
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Logical height after rotation
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Configured rotation
    pub const fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Configured background color
    pub const fn background(&self) -> Color {
        self.background
    }

    /// The packed pixel data, row-major MSB-first - the layout the panel
    /// controller consumes directly
    pub fn data(&self) -> &[u8] {
        &self.buf[..self.width_bytes as usize * self.height_memory as usize]
    }

    /// Fill the whole buffer with one color
    pub fn clear(&mut self, color: Color) {
        let len = self.width_bytes as usize * self.height_memory as usize;
        self.buf[..len].fill(color.fill_byte());
    }

    /// Fill a logical rectangle with one color
    ///
    /// Slow path: one bit at a time through the rotation mapping.
    pub fn clear_region(&mut self, x: u16, y: u16, w: u16, h: u16, color: Color) {
        for j in y..y.saturating_add(h) {
            for i in x..x.saturating_add(w) {
                self.set_pixel(i, j, color);
            }
        }
    }

    /// Map a logical coordinate to its physical (memory) coordinate
    fn to_physical(&self, x: u16, y: u16) -> Option<(u16, u16)> {
        let (x, y) = (i32::from(x), i32::from(y));
        let wm = i32::from(self.width_memory);
        let hm = i32::from(self.height_memory);

        let (px, py) = match self.rotation {
            Rotation::Rotate0 => (y, x),
            Rotation::Rotate90 => (x, hm - y - 1),
            Rotation::Rotate180 => (wm - y - 1, hm - x - 1),
            Rotation::Rotate270 => (wm - x - 1, y),
        };

        if px < 0 || px >= wm || py < 0 || py >= hm {
            return None;
        }
        Some((px as u16, py as u16))
    }

    /// Set one logical pixel
    ///
    /// Coordinates outside the panel are silently dropped - no error, no
    /// write.
    pub fn set_pixel(&mut self, x: u16, y: u16, color: Color) {
        let Some((px, py)) = self.to_physical(x, y) else {
            return;
        };

        let byte_index = py as usize * self.width_bytes as usize + px as usize / 8;
        let bit_mask = 0x80 >> (px % 8); // MSB first: 0x80, 0x40, ..., 0x01

        match color {
            Color::White => self.buf[byte_index] |= bit_mask,
            Color::Black => self.buf[byte_index] &= !bit_mask,
        }
    }

    /// Read one logical pixel back
    pub fn pixel(&self, x: u16, y: u16) -> Option<Color> {
        let (px, py) = self.to_physical(x, y)?;
        let byte_index = py as usize * self.width_bytes as usize + px as usize / 8;
        let bit_mask = 0x80 >> (px % 8);
        if self.buf[byte_index] & bit_mask != 0 {
            Some(Color::White)
        } else {
            Some(Color::Black)
        }
    }

    /// Draw one character
    ///
    /// Glyph bytes are consumed LSB-first, one bit per pixel down a column,
    /// then the next column; glyphs taller than 8 pixels wrap to a new
    /// sub-row every `height/2` columns. Zero bits draw the inverse color,
    /// so every character cell is opaque. Missing glyphs are a no-op.
    pub fn draw_char(
        &mut self,
        font: &impl GlyphSource,
        x: u16,
        y: u16,
        ch: char,
        size: FontSize,
        color: Color,
    ) {
        let Some(glyph) = font.glyph(ch, size) else {
            return;
        };

        let x0 = x;
        let mut x = x;
        let mut y = y;
        let mut y_base = y;

        for i in 0..size.bytes_per_glyph() {
            let Some(&byte) = glyph.get(i) else {
                return;
            };

            let mut bits = byte;
            for _ in 0..8 {
                if bits & 0x01 != 0 {
                    self.set_pixel(x, y, color);
                } else {
                    self.set_pixel(x, y, color.inverse());
                }
                bits >>= 1;
                y += 1;
            }

            x += 1;

            // Multi-byte-high glyphs: wrap to the next 8-pixel sub-row
            if size != FontSize::Size8 && x - x0 == size.advance() {
                x = x0;
                y_base += 8;
            }
            y = y_base;
        }
    }

    /// Draw a string, advancing `height/2` pixels per character
    pub fn draw_string(
        &mut self,
        font: &impl GlyphSource,
        x: u16,
        y: u16,
        text: &str,
        size: FontSize,
        color: Color,
    ) {
        let mut x = x;
        for ch in text.chars() {
            self.draw_char(font, x, y, ch, size, color);
            x += size.advance();
        }
    }

    /// Draw a static-asset bitmap
    ///
    /// Expects `width * ceil(height/8)` bytes, MSB-first, each byte spanning
    /// 8 vertical pixels of one column, advancing down a column then across.
    /// Set bits draw `color`, clear bits draw its inverse.
    pub fn draw_image(
        &mut self,
        x0: u16,
        y0: u16,
        width: u16,
        height: u16,
        bitmap: &[u8],
        color: Color,
    ) {
        let total_bytes = width as usize * (height as usize).div_ceil(8);
        let y_start = y0;
        let mut x = x0;
        let mut y = y0;

        for i in 0..total_bytes {
            let Some(&b) = bitmap.get(i) else {
                return;
            };

            let mut byte = b;
            for _ in 0..8 {
                if y - y_start >= height {
                    break;
                }
                let lit = byte & 0x80 != 0;
                self.set_pixel(x, y, if lit { color } else { color.inverse() });
                y += 1;
                byte <<= 1;
            }

            // Finished one column, go to next x
            if y - y_start == height {
                y = y_start;
                x += 1;
            }
        }
    }

    /// Draw a network-delivered bitmap
    ///
    /// Column-major: `w * ceil(h/8)` bytes, each byte 8 vertical pixels of
    /// one column with bit 7 topmost. Polarity is fixed - set bits are
    /// black, clear bits white - regardless of any caller color. This is the
    /// wire format of reassembled image payloads and must stay bit-exact.
    pub fn draw_bin_image(&mut self, bitmap: &[u8], x: u16, y: u16, w: u16, h: u16) {
        let bytes_per_col = (h as usize).div_ceil(8);

        for col in 0..w as usize {
            for row_byte in 0..bytes_per_col {
                let index = col * bytes_per_col + row_byte;
                let Some(&byte) = bitmap.get(index) else {
                    return;
                };

                for bit in 0..8usize {
                    let row = row_byte * 8 + bit;
                    if row >= h as usize {
                        break;
                    }

                    let on = (byte >> (7 - bit)) & 0x01 != 0;
                    let color = if on { Color::Black } else { Color::White };
                    self.set_pixel(x + col as u16, y + row as u16, color);
                }
            }
        }
    }

    fn plot(&mut self, x: i32, y: i32, color: Color) {
        if x >= 0 && y >= 0 {
            self.set_pixel(x as u16, y as u16, color);
        }
    }

    /// Draw a circle using the midpoint algorithm
    ///
    /// `fill` sweeps each octant span instead of plotting single points.
    pub fn draw_circle(&mut self, x0: u16, y0: u16, r: u16, color: Color, fill: bool) {
        let cx = i32::from(x0);
        let cy = i32::from(y0);
        let mut x: i32 = 0;
        let mut y: i32 = i32::from(r);
        let mut d: i32 = 3 - 2 * i32::from(r);

        if fill {
            while x <= y {
                for i in x..=y {
                    self.plot(cx + x, cy + i, color);
                    self.plot(cx - x, cy + i, color);
                    self.plot(cx - i, cy + x, color);
                    self.plot(cx - i, cy - x, color);
                    self.plot(cx - x, cy - i, color);
                    self.plot(cx + x, cy - i, color);
                    self.plot(cx + i, cy - x, color);
                    self.plot(cx + i, cy + x, color);
                }
                if d < 0 {
                    d += 4 * x + 6;
                } else {
                    d += 10 + 4 * (x - y);
                    y -= 1;
                }
                x += 1;
            }
        } else {
            while x <= y {
                self.plot(cx + x, cy + y, color);
                self.plot(cx - x, cy + y, color);
                self.plot(cx - y, cy + x, color);
                self.plot(cx - y, cy - x, color);
                self.plot(cx - x, cy - y, color);
                self.plot(cx + x, cy - y, color);
                self.plot(cx + y, cy - x, color);
                self.plot(cx + y, cy + x, color);

                if d < 0 {
                    d += 4 * x + 6;
                } else {
                    d += 10 + 4 * (x - y);
                    y -= 1;
                }
                x += 1;
            }
        }
    }
}
