//! Font lookup abstraction
//!
//! Glyph bitmap tables are large and board-specific, so the drawing code
//! treats them as an opaque lookup: a [`GlyphSource`] maps a character and a
//! size to raw glyph bytes. The byte format is the classic column-serial
//! layout: bytes are consumed LSB-first, each bit one pixel down a column,
//! wrapping to a new 8-pixel sub-row every `width` columns for glyphs taller
//! than 8 pixels.

/// Supported font sizes (glyph height in pixels)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FontSize {
    Size8,
    Size12,
    Size16,
    Size24,
    Size48,
}

impl FontSize {
    /// Glyph height in pixels
    pub const fn height(self) -> u16 {
        match self {
            FontSize::Size8 => 8,
            FontSize::Size12 => 12,
            FontSize::Size16 => 16,
            FontSize::Size24 => 24,
            FontSize::Size48 => 48,
        }
    }

    /// Horizontal advance per character
    pub const fn advance(self) -> u16 {
        self.height() / 2
    }

    /// Number of bytes in one glyph bitmap
    ///
    /// The 8-pixel font is a fixed 6-byte cell; taller fonts use
    /// `ceil(height/8)` sub-rows of `height/2` columns.
    pub const fn bytes_per_glyph(self) -> usize {
        match self {
            FontSize::Size8 => 6,
            s => {
                let h = s.height() as usize;
                h.div_ceil(8) * (h / 2)
            }
        }
    }
}

/// Opaque glyph bitmap lookup
///
/// Returns `None` for characters or sizes the table does not carry; the
/// drawing code treats that as a no-op.
pub trait GlyphSource {
    fn glyph(&self, code: char, size: FontSize) -> Option<&[u8]>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_per_glyph() {
        assert_eq!(FontSize::Size8.bytes_per_glyph(), 6);
        assert_eq!(FontSize::Size12.bytes_per_glyph(), 12);
        assert_eq!(FontSize::Size16.bytes_per_glyph(), 16);
        assert_eq!(FontSize::Size24.bytes_per_glyph(), 36);
        assert_eq!(FontSize::Size48.bytes_per_glyph(), 144);
    }

    #[test]
    fn test_advance() {
        assert_eq!(FontSize::Size8.advance(), 4);
        assert_eq!(FontSize::Size16.advance(), 8);
        assert_eq!(FontSize::Size48.advance(), 24);
    }
}
