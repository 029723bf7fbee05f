//! Built-in glyphs for the boot screen
//!
//! The device id is hex, so the firmware only carries the sixteen hex
//! digits, 8x16, in the column-serial format `draw_char` consumes: bytes
//! LSB-first down each column, eight columns per sub-row, two sub-rows.
//! Seven-segment shapes keep the table small and readable on the glass.

use esl_core::gfx::{FontSize, GlyphSource};

static HEX_16: [[u8; 16]; 16] = [
    [0x00, 0x7C, 0x02, 0x02, 0x02, 0x02, 0x7C, 0x00, 0x00, 0x3F, 0x40, 0x40, 0x40, 0x40, 0x3F, 0x00], // '0'
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x7C, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x3F, 0x00], // '1'
    [0x00, 0x00, 0x82, 0x82, 0x82, 0x82, 0x7C, 0x00, 0x00, 0x3F, 0x40, 0x40, 0x40, 0x40, 0x00, 0x00], // '2'
    [0x00, 0x00, 0x82, 0x82, 0x82, 0x82, 0x7C, 0x00, 0x00, 0x00, 0x40, 0x40, 0x40, 0x40, 0x3F, 0x00], // '3'
    [0x00, 0x7C, 0x80, 0x80, 0x80, 0x80, 0x7C, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x3F, 0x00], // '4'
    [0x00, 0x7C, 0x82, 0x82, 0x82, 0x82, 0x00, 0x00, 0x00, 0x00, 0x40, 0x40, 0x40, 0x40, 0x3F, 0x00], // '5'
    [0x00, 0x7C, 0x82, 0x82, 0x82, 0x82, 0x00, 0x00, 0x00, 0x3F, 0x40, 0x40, 0x40, 0x40, 0x3F, 0x00], // '6'
    [0x00, 0x00, 0x02, 0x02, 0x02, 0x02, 0x7C, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x3F, 0x00], // '7'
    [0x00, 0x7C, 0x82, 0x82, 0x82, 0x82, 0x7C, 0x00, 0x00, 0x3F, 0x40, 0x40, 0x40, 0x40, 0x3F, 0x00], // '8'
    [0x00, 0x7C, 0x82, 0x82, 0x82, 0x82, 0x7C, 0x00, 0x00, 0x00, 0x40, 0x40, 0x40, 0x40, 0x3F, 0x00], // '9'
    [0x00, 0x7C, 0x82, 0x82, 0x82, 0x82, 0x7C, 0x00, 0x00, 0x3F, 0x00, 0x00, 0x00, 0x00, 0x3F, 0x00], // 'A'
    [0x00, 0x7C, 0x80, 0x80, 0x80, 0x80, 0x00, 0x00, 0x00, 0x3F, 0x40, 0x40, 0x40, 0x40, 0x3F, 0x00], // 'B'
    [0x00, 0x7C, 0x02, 0x02, 0x02, 0x02, 0x00, 0x00, 0x00, 0x3F, 0x40, 0x40, 0x40, 0x40, 0x00, 0x00], // 'C'
    [0x00, 0x00, 0x80, 0x80, 0x80, 0x80, 0x7C, 0x00, 0x00, 0x3F, 0x40, 0x40, 0x40, 0x40, 0x3F, 0x00], // 'D'
    [0x00, 0x7C, 0x82, 0x82, 0x82, 0x82, 0x00, 0x00, 0x00, 0x3F, 0x40, 0x40, 0x40, 0x40, 0x00, 0x00], // 'E'
    [0x00, 0x7C, 0x82, 0x82, 0x82, 0x82, 0x00, 0x00, 0x00, 0x3F, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // 'F'
];

/// Glyph source covering '0'-'9' and 'A'-'F' at size 16
pub struct HexFont;

impl GlyphSource for HexFont {
    fn glyph(&self, code: char, size: FontSize) -> Option<&[u8]> {
        if size != FontSize::Size16 {
            return None;
        }
        let index = match code {
            '0'..='9' => code as usize - '0' as usize,
            'A'..='F' => code as usize - 'A' as usize + 10,
            _ => return None,
        };
        Some(&HEX_16[index])
    }
}
