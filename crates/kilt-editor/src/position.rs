//! Buffer coordinates.
//!
//! All coordinates are **0-indexed**. Row 0 is the first line, column 0 is
//! the first byte of a line. Columns count bytes: kilt does not measure
//! display width, so one byte is one screen cell.
//!
//! The same type serves for the cursor and for the scroll offset (the buffer
//! coordinate of the top-left visible cell). The wire protocol's 1-indexed
//! coordinates belong in `kilt_term::ansi`, never here.

use std::fmt;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A position in the line buffer: (row, col), both 0-indexed.
///
/// `row` may equal the number of lines: that addresses the virtual empty
/// line just past the end of the file.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    /// The origin — row 0, column 0.
    pub const ZERO: Self = Self { row: 0, col: 0 };

    /// Create a new position.
    #[inline]
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Offset of `self` from `origin`, saturating at zero.
    ///
    /// With `origin` the scroll offset this is the on-screen cell.
    #[inline]
    #[must_use]
    pub const fn relative_to(self, origin: Self) -> Self {
        Self {
            row: self.row.saturating_sub(origin.row),
            col: self.col.saturating_sub(origin.col),
        }
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pos({}:{})", self.row, self.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 1-indexed for human display.
        write!(f, "{}:{}", self.row + 1, self.col + 1)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
