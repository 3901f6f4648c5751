#![cfg_attr(not(test), no_std)]

//! VGA text-mode terminal core
//!
//! Everything here is target independent: the cell codec that produces the
//! 16-bit values the hardware expects, a bounds-checked grid of those cells,
//! and the [`Terminal`] state machine that turns a byte stream into cell
//! writes, line wraps and scrolls.
//!
//! The kernel crate points a [`Terminal`] at the memory-mapped buffer at
//! [`VGA_BUFFER_ADDR`]; tests point one at an ordinary [`Buffer`] value.

pub mod cell;
pub mod color;
pub mod error;
pub mod grid;
pub mod terminal;

pub use cell::{ScreenChar, make_cell};
pub use color::{Color, ColorCode, DEFAULT_BACKGROUND, DEFAULT_COLOR, DEFAULT_FOREGROUND, combine_colors};
pub use error::TerminalError;
pub use grid::{BUFFER_HEIGHT, BUFFER_WIDTH, Buffer, Position, VGA_BUFFER_ADDR};
pub use terminal::{ScrollMode, Terminal};
