//! The system's VGA text terminal
//!
//! A single [`Terminal`] over the memory-mapped buffer, created by [`init`]
//! and guarded by a spin lock that is only taken with interrupts disabled.
//! Every accessor reports [`TerminalError::NotInitialized`] until `init` has
//! run, and moves the hardware cursor to the logical one afterwards.

use core::fmt;

use conquer_once::spin::OnceCell;
use spin::Mutex;
use vgaterm_terminal::{Buffer, ColorCode, Position, ScreenChar, ScrollMode, Terminal, TerminalError};
use x86_64::instructions::interrupts;

use crate::cursor;

/// Underline-shaped hardware cursor
const CURSOR_START_SCANLINE: u8 = 14;
const CURSOR_END_SCANLINE: u8 = cursor::MAX_SCANLINE;

static TERMINAL: OnceCell<Mutex<Terminal<'static>>> = OnceCell::uninit();

/// Take over the text buffer, or reset it if already taken.
pub fn init() {
    interrupts::without_interrupts(|| {
        let mut created = false;
        let terminal = TERMINAL.get_or_init(|| {
            created = true;
            // the cell is only ever set here, so this is the sole reference
            Mutex::new(Terminal::new(unsafe { Buffer::vga() }))
        });

        let mut terminal = terminal.lock();
        if !created {
            terminal.initialize();
        }
        cursor::enable(CURSOR_START_SCANLINE, CURSOR_END_SCANLINE);
        cursor::update(terminal.position());
    });
}

/// Run `f` with exclusive access to the terminal.
pub fn with_terminal<F, R>(f: F) -> Result<R, TerminalError>
where
    F: FnOnce(&mut Terminal<'static>) -> R,
{
    interrupts::without_interrupts(|| {
        let terminal = TERMINAL.get().ok_or(TerminalError::NotInitialized)?;
        let mut terminal = terminal.lock();
        let result = f(&mut *terminal);
        cursor::update(terminal.position());
        Ok(result)
    })
}

pub fn set_color(color_code: ColorCode) -> Result<(), TerminalError> {
    with_terminal(|terminal| terminal.set_color(color_code))
}

pub fn set_color_indices(foreground: u8, background: u8) -> Result<(), TerminalError> {
    with_terminal(|terminal| terminal.set_color_indices(foreground, background))?
}

pub fn set_scroll_mode(scroll_mode: ScrollMode) -> Result<(), TerminalError> {
    with_terminal(|terminal| terminal.set_scroll_mode(scroll_mode))
}

pub fn write_byte(byte: u8) -> Result<(), TerminalError> {
    with_terminal(|terminal| terminal.write_byte(byte))
}

pub fn write_bytes(data: &[u8]) -> Result<(), TerminalError> {
    with_terminal(|terminal| terminal.write_bytes(data))
}

/// Write `data` up to its first NUL byte.
pub fn write_string(data: &[u8]) -> Result<(), TerminalError> {
    with_terminal(|terminal| terminal.write_string(data))
}

pub fn put_entry_at(
    character: u8,
    color_code: ColorCode,
    column: usize,
    row: usize,
) -> Result<(), TerminalError> {
    with_terminal(|terminal| terminal.put_entry_at(character, color_code, column, row))?
}

pub fn entry_at(column: usize, row: usize) -> Result<ScreenChar, TerminalError> {
    with_terminal(|terminal| terminal.entry_at(column, row))?
}

pub fn position() -> Result<Position, TerminalError> {
    with_terminal(|terminal| terminal.position())
}

/// Blank the screen in the active color and home the cursor.
pub fn clear_screen() -> Result<(), TerminalError> {
    with_terminal(|terminal| terminal.clear_screen())
}

/// Prints to the VGA text buffer.
#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => ($crate::vga_buffer::_print(format_args!($($arg)*)));
}

/// Prints to the VGA text buffer, appending a newline.
#[macro_export]
macro_rules! println {
    () => ($crate::print!("\n"));
    ($($arg:tt)*) => ($crate::print!("{}\n", format_args!($($arg)*)));
}

/// Falls back to the serial port while the terminal is not set up.
#[doc(hidden)]
pub fn _print(args: fmt::Arguments) {
    use core::fmt::Write;

    let printed = with_terminal(|terminal| {
        // Terminal::write_str is infallible
        let _ = terminal.write_fmt(args);
    });
    if printed.is_err() {
        crate::serial::_print(args);
    }
}

#[test_case]
fn test_println_simple() {
    crate::println!("test_println_simple output");
}

#[test_case]
fn test_println_many() {
    for _ in 0..200 {
        crate::println!("test_println_many output");
    }
}

#[test_case]
fn test_println_output() {
    use core::fmt::Write;

    let s = "Some test string that fits on a single line";
    with_terminal(|terminal| {
        terminal.initialize();
        writeln!(terminal, "{}", s).expect("writeln failed");
        for (i, c) in s.chars().enumerate() {
            let screen_char = terminal.entry_at(i, 0).expect("column in range");
            assert_eq!(char::from(screen_char.ascii_character), c);
        }
        assert_eq!(terminal.position(), Position::new(1, 0).unwrap());
    })
    .expect("terminal not initialized");
}

#[test_case]
fn test_put_entry_at_rejects_out_of_range() {
    let color = vgaterm_terminal::DEFAULT_COLOR;
    assert_eq!(
        put_entry_at(b'x', color, vgaterm_terminal::BUFFER_WIDTH, 0),
        Err(TerminalError::OutOfBounds {
            row: 0,
            column: vgaterm_terminal::BUFFER_WIDTH,
        })
    );
}

#[test_case]
fn test_set_color_indices_rejects_wide_index() {
    assert_eq!(
        set_color_indices(16, 0),
        Err(TerminalError::InvalidColorIndex(16))
    );
}
