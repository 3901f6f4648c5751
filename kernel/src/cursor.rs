//! Hardware text cursor
//!
//! The blinking cursor is drawn by the adapter itself and is positioned
//! through the CRT controller's index/data port pair.

use vgaterm_terminal::Position;
use x86_64::instructions::port::Port;

const CRTC_INDEX: u16 = 0x3D4;
const CRTC_DATA: u16 = 0x3D5;

const CURSOR_START: u8 = 0x0A;
const CURSOR_END: u8 = 0x0B;
const CURSOR_LOCATION_HIGH: u8 = 0x0E;
const CURSOR_LOCATION_LOW: u8 = 0x0F;

/// Bit 5 of the cursor start register hides the cursor
const CURSOR_DISABLE: u8 = 0x20;

/// Last scanline of a character cell in 80x25 mode
pub const MAX_SCANLINE: u8 = 15;

fn write_register(register: u8, value: u8) {
    let mut index: Port<u8> = Port::new(CRTC_INDEX);
    let mut data: Port<u8> = Port::new(CRTC_DATA);
    unsafe {
        index.write(register);
        data.write(value);
    }
}

fn read_register(register: u8) -> u8 {
    let mut index: Port<u8> = Port::new(CRTC_INDEX);
    let mut data: Port<u8> = Port::new(CRTC_DATA);
    unsafe {
        index.write(register);
        data.read()
    }
}

/// Move the hardware cursor to `position`.
pub fn update(position: Position) {
    let [low, high] = (position.index() as u16).to_le_bytes();
    write_register(CURSOR_LOCATION_LOW, low);
    write_register(CURSOR_LOCATION_HIGH, high);
}

/// Show the cursor as scanlines `start..=end` of the cell.
pub fn enable(start: u8, end: u8) {
    let start = start.min(MAX_SCANLINE);
    let end = end.min(MAX_SCANLINE);
    // keep the reserved upper bits of both registers
    write_register(CURSOR_START, (read_register(CURSOR_START) & 0xC0) | start);
    write_register(CURSOR_END, (read_register(CURSOR_END) & 0xE0) | end);
}

pub fn disable() {
    write_register(CURSOR_START, CURSOR_DISABLE);
}
