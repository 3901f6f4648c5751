//! One character cell of the text buffer

use crate::color::ColorCode;

/// A character plus its attribute, laid out the way the adapter reads it:
/// character byte first, attribute byte second. Read as a little-endian
/// `u16` that is `character | attribute << 8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct ScreenChar {
    pub ascii_character: u8,
    pub color_code: ColorCode,
}

impl ScreenChar {
    pub const fn new(ascii_character: u8, color_code: ColorCode) -> ScreenChar {
        ScreenChar {
            ascii_character,
            color_code,
        }
    }

    /// A space in the given color
    pub const fn blank(color_code: ColorCode) -> ScreenChar {
        ScreenChar::new(b' ', color_code)
    }

    pub const fn to_u16(self) -> u16 {
        self.ascii_character as u16 | (self.color_code.as_u8() as u16) << 8
    }

    pub const fn from_u16(raw: u16) -> ScreenChar {
        ScreenChar::new(raw as u8, ColorCode::from_raw((raw >> 8) as u8))
    }
}

/// Pack a character and attribute into a cell.
pub const fn make_cell(character: u8, color: ColorCode) -> ScreenChar {
    ScreenChar::new(character, color)
}
