//! The fixed cell grid and validated positions into it

use volatile::Volatile;

use crate::cell::ScreenChar;
use crate::error::TerminalError;

pub const BUFFER_HEIGHT: usize = 25;
pub const BUFFER_WIDTH: usize = 80;

/// Address of the text buffer in colour text mode
pub const VGA_BUFFER_ADDR: usize = 0xb8000;

/// A (row, column) pair known to lie inside the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    row: usize,
    column: usize,
}

impl Position {
    pub const ORIGIN: Position = Position { row: 0, column: 0 };

    pub fn new(row: usize, column: usize) -> Result<Position, TerminalError> {
        if row < BUFFER_HEIGHT && column < BUFFER_WIDTH {
            Ok(Position { row, column })
        } else {
            Err(TerminalError::OutOfBounds { row, column })
        }
    }

    pub const fn row(self) -> usize {
        self.row
    }

    pub const fn column(self) -> usize {
        self.column
    }

    /// Offset of this cell from the start of the buffer, in cells
    pub const fn index(self) -> usize {
        self.row * BUFFER_WIDTH + self.column
    }
}

/// The text buffer, row-major, one volatile cell per character.
///
/// The volatile wrapper keeps the compiler from eliding stores whose only
/// observer is the display adapter.
#[repr(transparent)]
pub struct Buffer {
    chars: [[Volatile<ScreenChar>; BUFFER_WIDTH]; BUFFER_HEIGHT],
}

impl Buffer {
    /// An ordinary in-memory buffer with every cell set to `fill`.
    pub fn new(fill: ScreenChar) -> Buffer {
        Buffer {
            chars: core::array::from_fn(|_| core::array::from_fn(|_| Volatile::new(fill))),
        }
    }

    /// The memory-mapped text buffer.
    ///
    /// # Safety
    ///
    /// `VGA_BUFFER_ADDR` must be mapped to the adapter's text memory and the
    /// returned reference must be the only one alive.
    pub unsafe fn vga() -> &'static mut Buffer {
        unsafe { &mut *(VGA_BUFFER_ADDR as *mut Buffer) }
    }

    pub fn read(&self, position: Position) -> ScreenChar {
        self.chars[position.row][position.column].read()
    }

    pub fn write(&mut self, position: Position, cell: ScreenChar) {
        self.chars[position.row][position.column].write(cell);
    }

    /// Set every cell of `row` to `cell`. Rows past the bottom are ignored.
    pub(crate) fn fill_row(&mut self, row: usize, cell: ScreenChar) {
        if let Some(cells) = self.chars.get_mut(row) {
            for slot in cells.iter_mut() {
                slot.write(cell);
            }
        }
    }
}
