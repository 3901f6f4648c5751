//! Terminal state machine
//!
//! A [`Terminal`] owns the cursor and the active color and has exclusive
//! access to a [`Buffer`]. Bytes written to it land at the cursor; the cursor
//! wraps at the right edge and the grid scrolls up once the cursor would
//! leave the bottom row.
//!
//! Constructing a terminal initializes it, so there is no way to write through
//! one that has not been set up.

use core::fmt;

use crate::cell::{ScreenChar, make_cell};
use crate::color::{ColorCode, DEFAULT_COLOR, combine_colors};
use crate::error::TerminalError;
use crate::grid::{BUFFER_HEIGHT, BUFFER_WIDTH, Buffer, Position};

/// What happens to the attribute of text that scrolls up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollMode {
    /// Moved text is redrawn in the active color
    #[default]
    Repaint,
    /// Moved text keeps the attribute it was written with
    PreserveColor,
}

pub struct Terminal<'a> {
    row: usize,
    column: usize,
    color_code: ColorCode,
    scroll_mode: ScrollMode,
    buffer: &'a mut Buffer,
}

impl<'a> Terminal<'a> {
    /// Take over `buffer` and initialize it.
    pub fn new(buffer: &'a mut Buffer) -> Terminal<'a> {
        let mut terminal = Terminal {
            row: 0,
            column: 0,
            color_code: DEFAULT_COLOR,
            scroll_mode: ScrollMode::default(),
            buffer,
        };
        terminal.initialize();
        terminal
    }

    pub fn with_scroll_mode(mut self, scroll_mode: ScrollMode) -> Terminal<'a> {
        self.scroll_mode = scroll_mode;
        self
    }

    /// Home the cursor, restore the default color and blank the grid.
    pub fn initialize(&mut self) {
        self.color_code = DEFAULT_COLOR;
        self.clear_screen();
    }

    /// Home the cursor and blank the grid in the active color.
    pub fn clear_screen(&mut self) {
        self.row = 0;
        self.column = 0;
        for row in 0..BUFFER_HEIGHT {
            self.clear_row(row);
        }
    }

    /// Change the color of subsequent writes. Existing text keeps its color.
    pub fn set_color(&mut self, color_code: ColorCode) {
        self.color_code = color_code;
    }

    /// [`set_color`](Self::set_color) from raw palette indices.
    pub fn set_color_indices(&mut self, foreground: u8, background: u8) -> Result<(), TerminalError> {
        let color_code = combine_colors(foreground, background)?;
        self.set_color(color_code);
        Ok(())
    }

    pub fn set_scroll_mode(&mut self, scroll_mode: ScrollMode) {
        self.scroll_mode = scroll_mode;
    }

    pub fn color(&self) -> ColorCode {
        self.color_code
    }

    pub fn scroll_mode(&self) -> ScrollMode {
        self.scroll_mode
    }

    /// Where the next character will be written
    pub fn position(&self) -> Position {
        self.cursor()
    }

    /// Store one cell directly, leaving the cursor alone.
    pub fn put_entry_at(
        &mut self,
        character: u8,
        color_code: ColorCode,
        column: usize,
        row: usize,
    ) -> Result<(), TerminalError> {
        let position = Position::new(row, column)?;
        self.buffer.write(position, make_cell(character, color_code));
        Ok(())
    }

    /// Read back one stored cell.
    pub fn entry_at(&self, column: usize, row: usize) -> Result<ScreenChar, TerminalError> {
        let position = Position::new(row, column)?;
        Ok(self.buffer.read(position))
    }

    /// Write one byte at the cursor. `\n` only moves the cursor.
    pub fn write_byte(&mut self, byte: u8) {
        match byte {
            b'\n' => {
                self.column = 0;
                self.new_line();
            }
            byte => {
                let position = self.cursor();
                self.buffer.write(position, make_cell(byte, self.color_code));
                self.column += 1;
                if self.column == BUFFER_WIDTH {
                    self.column = 0;
                    self.new_line();
                }
            }
        }
    }

    /// Write every byte of `data`, in order.
    pub fn write_bytes(&mut self, data: &[u8]) {
        for &byte in data {
            self.write_byte(byte);
        }
    }

    /// Write `data` up to, not including, its first NUL byte.
    pub fn write_string(&mut self, data: &[u8]) {
        let len = data.iter().position(|&byte| byte == 0).unwrap_or(data.len());
        self.write_bytes(&data[..len]);
    }

    fn cursor(&self) -> Position {
        // row and column are kept in range by write_byte and new_line
        Position::new(self.row, self.column).unwrap_or(Position::ORIGIN)
    }

    fn new_line(&mut self) {
        self.row += 1;
        if self.row == BUFFER_HEIGHT {
            self.scroll();
            self.row = BUFFER_HEIGHT - 1;
        }
    }

    fn scroll(&mut self) {
        for row in 1..BUFFER_HEIGHT {
            for column in 0..BUFFER_WIDTH {
                let (Ok(from), Ok(to)) = (Position::new(row, column), Position::new(row - 1, column))
                else {
                    continue;
                };
                let cell = self.buffer.read(from);
                let moved = match self.scroll_mode {
                    ScrollMode::Repaint => make_cell(cell.ascii_character, self.color_code),
                    ScrollMode::PreserveColor => cell,
                };
                self.buffer.write(to, moved);
            }
        }
        self.clear_row(BUFFER_HEIGHT - 1);
    }

    fn clear_row(&mut self, row: usize) {
        self.buffer.fill_row(row, ScreenChar::blank(self.color_code));
    }
}

impl fmt::Write for Terminal<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            match byte {
                // printable ASCII byte or newline
                0x20..=0x7e | b'\n' => self.write_byte(byte),
                // not part of printable ASCII range
                _ => self.write_byte(0xfe),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use core::fmt::Write;

    fn blank_buffer() -> Buffer {
        Buffer::new(ScreenChar::blank(ColorCode::from_raw(0)))
    }

    fn row_text(terminal: &Terminal<'_>, row: usize) -> [u8; BUFFER_WIDTH] {
        let mut text = [0u8; BUFFER_WIDTH];
        for (column, slot) in text.iter_mut().enumerate() {
            *slot = terminal.entry_at(column, row).unwrap().ascii_character;
        }
        text
    }

    fn cursor(terminal: &Terminal<'_>) -> (usize, usize) {
        let position = terminal.position();
        (position.row(), position.column())
    }

    #[test]
    fn test_initialize_clears_grid() {
        let mut buffer = Buffer::new(ScreenChar::new(b'#', ColorCode::from_raw(0x4f)));
        let terminal = Terminal::new(&mut buffer);

        assert_eq!(cursor(&terminal), (0, 0));
        assert_eq!(terminal.color(), DEFAULT_COLOR);
        for row in 0..BUFFER_HEIGHT {
            for column in 0..BUFFER_WIDTH {
                assert_eq!(
                    terminal.entry_at(column, row).unwrap(),
                    make_cell(b' ', DEFAULT_COLOR)
                );
            }
        }
    }

    #[test]
    fn test_reinitialize_is_idempotent() {
        let mut buffer = blank_buffer();
        let mut terminal = Terminal::new(&mut buffer);
        terminal.set_color(ColorCode::new(Color::White, Color::Red));
        terminal.write_bytes(b"some text\nmore");

        terminal.initialize();
        let once: [[ScreenChar; BUFFER_WIDTH]; BUFFER_HEIGHT] = core::array::from_fn(|row| {
            core::array::from_fn(|column| terminal.entry_at(column, row).unwrap())
        });
        terminal.initialize();

        assert_eq!(cursor(&terminal), (0, 0));
        assert_eq!(terminal.color(), DEFAULT_COLOR);
        for row in 0..BUFFER_HEIGHT {
            for column in 0..BUFFER_WIDTH {
                assert_eq!(terminal.entry_at(column, row).unwrap(), once[row][column]);
            }
        }
    }

    #[test]
    fn test_hello_kernel_world() {
        let mut buffer = blank_buffer();
        let mut terminal = Terminal::new(&mut buffer);

        terminal.write_string(b"Hello, Kernel World!\nIt's a nice day.");

        let first = b"Hello, Kernel World!";
        let second = b"It's a nice day.";
        for (column, &byte) in first.iter().enumerate() {
            assert_eq!(terminal.entry_at(column, 0).unwrap(), make_cell(byte, DEFAULT_COLOR));
        }
        for (column, &byte) in second.iter().enumerate() {
            assert_eq!(terminal.entry_at(column, 1).unwrap(), make_cell(byte, DEFAULT_COLOR));
        }
        assert_eq!(terminal.entry_at(first.len(), 0).unwrap().ascii_character, b' ');
        assert_eq!(cursor(&terminal), (1, 16));
    }

    #[test]
    fn test_newline_moves_cursor_only() {
        let mut buffer = blank_buffer();
        let mut terminal = Terminal::new(&mut buffer);
        terminal.write_bytes(b"abc");

        terminal.write_byte(b'\n');

        assert_eq!(cursor(&terminal), (1, 0));
        assert_eq!(&row_text(&terminal, 0)[..4], b"abc ");
        assert!(row_text(&terminal, 1).iter().all(|&byte| byte == b' '));
    }

    #[test]
    fn test_column_wrap() {
        let mut buffer = blank_buffer();
        let mut terminal = Terminal::new(&mut buffer);
        terminal.write_byte(b'\n');
        let line: [u8; BUFFER_WIDTH] = core::array::from_fn(|i| b'a' + (i % 26) as u8);

        terminal.write_bytes(&line);

        assert_eq!(cursor(&terminal), (2, 0));
        assert_eq!(row_text(&terminal, 1), line);
        assert!(row_text(&terminal, 2).iter().all(|&byte| byte == b' '));
    }

    #[test]
    fn test_full_grid_plus_one_scrolls_once() {
        let mut buffer = blank_buffer();
        let mut terminal = Terminal::new(&mut buffer);
        for row in 0..BUFFER_HEIGHT {
            terminal.write_bytes(&[b'A' + row as u8; BUFFER_WIDTH]);
        }
        terminal.write_byte(b'!');

        // row r now holds what row r + 1 held, so 'A' is gone
        for row in 0..BUFFER_HEIGHT - 1 {
            assert_eq!(row_text(&terminal, row), [b'B' + row as u8; BUFFER_WIDTH]);
        }
        let last = row_text(&terminal, BUFFER_HEIGHT - 1);
        assert_eq!(last[0], b'!');
        assert!(last[1..].iter().all(|&byte| byte == b' '));
        assert_eq!(cursor(&terminal), (BUFFER_HEIGHT - 1, 1));
    }

    #[test]
    fn test_newline_on_last_row_scrolls() {
        let mut buffer = blank_buffer();
        let mut terminal = Terminal::new(&mut buffer);
        terminal.write_bytes(b"top");
        for _ in 0..BUFFER_HEIGHT - 1 {
            terminal.write_byte(b'\n');
        }
        terminal.write_bytes(b"bottom");
        assert_eq!(cursor(&terminal), (BUFFER_HEIGHT - 1, 6));

        terminal.write_byte(b'\n');

        assert_eq!(cursor(&terminal), (BUFFER_HEIGHT - 1, 0));
        assert_eq!(&row_text(&terminal, BUFFER_HEIGHT - 2)[..6], b"bottom");
        assert!(row_text(&terminal, BUFFER_HEIGHT - 1).iter().all(|&byte| byte == b' '));
        assert!(row_text(&terminal, 0).iter().all(|&byte| byte == b' '));
    }

    #[test]
    fn test_scroll_repaints_with_active_color() {
        let mut buffer = blank_buffer();
        let mut terminal = Terminal::new(&mut buffer);
        terminal.write_bytes(b"\nred");
        let green = ColorCode::new(Color::Green, Color::Black);
        terminal.set_color(green);
        for _ in 0..BUFFER_HEIGHT - 1 {
            terminal.write_byte(b'\n');
        }

        let moved = terminal.entry_at(0, 0).unwrap();
        assert_eq!(moved, make_cell(b'r', green));
        assert_eq!(
            terminal.entry_at(0, BUFFER_HEIGHT - 1).unwrap(),
            ScreenChar::blank(green)
        );
    }

    #[test]
    fn test_scroll_can_preserve_color() {
        let mut buffer = blank_buffer();
        let mut terminal = Terminal::new(&mut buffer).with_scroll_mode(ScrollMode::PreserveColor);
        terminal.write_bytes(b"\nred");
        let green = ColorCode::new(Color::Green, Color::Black);
        terminal.set_color(green);
        for _ in 0..BUFFER_HEIGHT - 1 {
            terminal.write_byte(b'\n');
        }

        assert_eq!(terminal.entry_at(0, 0).unwrap(), make_cell(b'r', DEFAULT_COLOR));
        assert_eq!(
            terminal.entry_at(0, BUFFER_HEIGHT - 1).unwrap(),
            ScreenChar::blank(green)
        );
    }

    #[test]
    fn test_set_color_affects_later_cells_only() {
        let mut buffer = blank_buffer();
        let mut terminal = Terminal::new(&mut buffer);
        terminal.write_byte(b'a');
        let white_on_blue = ColorCode::new(Color::White, Color::Blue);

        terminal.set_color(white_on_blue);
        terminal.write_byte(b'b');

        assert_eq!(terminal.entry_at(0, 0).unwrap(), make_cell(b'a', DEFAULT_COLOR));
        assert_eq!(terminal.entry_at(1, 0).unwrap(), make_cell(b'b', white_on_blue));
    }

    #[test]
    fn test_set_color_indices_validates() {
        let mut buffer = blank_buffer();
        let mut terminal = Terminal::new(&mut buffer);

        assert_eq!(
            terminal.set_color_indices(3, 16),
            Err(TerminalError::InvalidColorIndex(16))
        );
        assert_eq!(terminal.color(), DEFAULT_COLOR);

        terminal.set_color_indices(15, 4).unwrap();
        assert_eq!(terminal.color().as_u8(), 0x4f);
    }

    #[test]
    fn test_put_entry_at_bounds() {
        let mut buffer = blank_buffer();
        let mut terminal = Terminal::new(&mut buffer);
        let color = ColorCode::new(Color::Cyan, Color::Black);

        terminal.put_entry_at(b'z', color, BUFFER_WIDTH - 1, BUFFER_HEIGHT - 1).unwrap();
        assert_eq!(
            terminal.put_entry_at(b'z', color, BUFFER_WIDTH, 0),
            Err(TerminalError::OutOfBounds { row: 0, column: BUFFER_WIDTH })
        );
        assert_eq!(
            terminal.entry_at(0, BUFFER_HEIGHT),
            Err(TerminalError::OutOfBounds { row: BUFFER_HEIGHT, column: 0 })
        );

        assert_eq!(
            terminal.entry_at(BUFFER_WIDTH - 1, BUFFER_HEIGHT - 1).unwrap(),
            make_cell(b'z', color)
        );
        assert_eq!(cursor(&terminal), (0, 0));
    }

    #[test]
    fn test_write_string_stops_at_nul() {
        let mut buffer = blank_buffer();
        let mut terminal = Terminal::new(&mut buffer);

        terminal.write_string(b"ok\0ignored");

        assert_eq!(&row_text(&terminal, 0)[..3], b"ok ");
        assert_eq!(cursor(&terminal), (0, 2));
    }

    #[test]
    fn test_write_bytes_passes_raw_bytes() {
        let mut buffer = blank_buffer();
        let mut terminal = Terminal::new(&mut buffer);

        terminal.write_bytes(&[0x01, 0xdb, 0x00]);

        assert_eq!(&row_text(&terminal, 0)[..3], &[0x01, 0xdb, 0x00]);
        assert_eq!(cursor(&terminal), (0, 3));
    }

    #[test]
    fn test_fmt_write_replaces_non_ascii() {
        let mut buffer = blank_buffer();
        let mut terminal = Terminal::new(&mut buffer);

        write!(terminal, "{}é\t", 42).unwrap();

        // 'é' is two UTF-8 bytes
        assert_eq!(&row_text(&terminal, 0)[..5], &[b'4', b'2', 0xfe, 0xfe, 0xfe]);
    }

    #[test]
    fn test_clear_screen_keeps_active_color() {
        let mut buffer = blank_buffer();
        let mut terminal = Terminal::new(&mut buffer);
        let color = ColorCode::new(Color::Black, Color::LightGray);
        terminal.write_bytes(b"text");
        terminal.set_color(color);

        terminal.clear_screen();

        assert_eq!(cursor(&terminal), (0, 0));
        assert_eq!(terminal.color(), color);
        assert_eq!(terminal.entry_at(0, 0).unwrap(), ScreenChar::blank(color));
    }
}
