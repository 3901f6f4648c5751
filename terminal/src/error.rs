//! Error types for terminal operations

use core::fmt;

use crate::grid::{BUFFER_HEIGHT, BUFFER_WIDTH};

/// Failure of a terminal operation
///
/// Every check runs before anything is written, so an error never leaves the
/// grid or the cursor half-updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalError {
    /// A direct cell address fell outside the grid
    OutOfBounds { row: usize, column: usize },
    /// The global terminal was used before `init`
    NotInitialized,
    /// A color index outside 0..=15
    InvalidColorIndex(u8),
}

impl fmt::Display for TerminalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminalError::OutOfBounds { row, column } => write!(
                f,
                "cell (row {}, column {}) is outside the {}x{} grid",
                row, column, BUFFER_WIDTH, BUFFER_HEIGHT
            ),
            TerminalError::NotInitialized => f.write_str("terminal used before initialization"),
            TerminalError::InvalidColorIndex(index) => {
                write!(f, "color index {} is not in 0..=15", index)
            }
        }
    }
}
