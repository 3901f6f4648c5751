//! Hardware text-mode colors and the packed attribute byte

use crate::error::TerminalError;

/// The sixteen VGA palette entries
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Color {
    Black = 0,
    Blue = 1,
    Green = 2,
    Cyan = 3,
    Red = 4,
    Magenta = 5,
    Brown = 6,
    LightGray = 7,
    DarkGray = 8,
    LightBlue = 9,
    LightGreen = 10,
    LightCyan = 11,
    LightRed = 12,
    Pink = 13,
    Yellow = 14,
    White = 15,
}

impl Color {
    /// Palette in index order
    pub const ALL: [Color; 16] = [
        Color::Black,
        Color::Blue,
        Color::Green,
        Color::Cyan,
        Color::Red,
        Color::Magenta,
        Color::Brown,
        Color::LightGray,
        Color::DarkGray,
        Color::LightBlue,
        Color::LightGreen,
        Color::LightCyan,
        Color::LightRed,
        Color::Pink,
        Color::Yellow,
        Color::White,
    ];

    /// Look up a palette entry by its 4-bit index
    pub fn from_index(index: u8) -> Result<Color, TerminalError> {
        Color::ALL
            .get(usize::from(index))
            .copied()
            .ok_or(TerminalError::InvalidColorIndex(index))
    }

    pub const fn index(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Color {
    type Error = TerminalError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Color::from_index(index)
    }
}

/// Foreground used by a freshly initialized terminal
pub const DEFAULT_FOREGROUND: Color = Color::Blue;
/// Background used by a freshly initialized terminal
pub const DEFAULT_BACKGROUND: Color = Color::Black;
/// Attribute used by a freshly initialized terminal
pub const DEFAULT_COLOR: ColorCode = ColorCode::new(DEFAULT_FOREGROUND, DEFAULT_BACKGROUND);

/// Attribute byte: foreground in the low nibble, background in the high nibble
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct ColorCode(u8);

impl ColorCode {
    pub const fn new(foreground: Color, background: Color) -> ColorCode {
        ColorCode((background as u8) << 4 | (foreground as u8))
    }

    /// Every byte is a valid attribute, so this cannot fail.
    pub const fn from_raw(raw: u8) -> ColorCode {
        ColorCode(raw)
    }

    pub const fn as_u8(self) -> u8 {
        self.0
    }

    pub fn foreground(self) -> Color {
        Color::ALL[usize::from(self.0 & 0x0f)]
    }

    pub fn background(self) -> Color {
        Color::ALL[usize::from(self.0 >> 4)]
    }
}

/// Pack two raw palette indices into an attribute byte.
///
/// Indices above 15 would spill into the neighbouring nibble, so they are
/// rejected instead.
pub fn combine_colors(foreground: u8, background: u8) -> Result<ColorCode, TerminalError> {
    let foreground = Color::from_index(foreground)?;
    let background = Color::from_index(background)?;
    Ok(ColorCode::new(foreground, background))
}
