//! Cursor controller — movement keys against buffer and viewport bounds.
//!
//! A [`Motion`] is decoded from a key and applied to the cursor (and, at the
//! top and left edges, to the scroll offset). The rules:
//!
//! | Motion   | Effect                                                     |
//! |----------|------------------------------------------------------------|
//! | Left     | column − 1; at column 0, scroll left one column if possible |
//! | Right    | column + 1, never past the end of the current line         |
//! | Up       | row − 1; at row 0, scroll up one row if possible           |
//! | Down     | row + 1, stopping on the virtual line past end-of-file     |
//! | PageUp   | Up, repeated once per screen row                           |
//! | PageDown | Down, repeated once per screen row                         |
//! | Home     | column 0                                                   |
//! | End      | end of the current line                                    |
//!
//! After every vertical step the column snaps back to the new line's length,
//! so the cursor never floats past the end of a shorter line.
//!
//! Once the viewport is reconciled, a cursor on row 0 or column 0 always has
//! a zero offset on that axis, so the Up/Left scroll steps are no-ops there.

use kilt_term::input::KeyCode;
use kilt_term::terminal::Size;

use crate::buffer::LineBuffer;
use crate::position::Position;

/// A cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
}

impl Motion {
    /// The motion bound to `code`, if any.
    #[must_use]
    pub const fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Left => Some(Self::Left),
            KeyCode::Right => Some(Self::Right),
            KeyCode::Up => Some(Self::Up),
            KeyCode::Down => Some(Self::Down),
            KeyCode::PageUp => Some(Self::PageUp),
            KeyCode::PageDown => Some(Self::PageDown),
            KeyCode::Home => Some(Self::Home),
            KeyCode::End => Some(Self::End),
            _ => None,
        }
    }
}

/// Apply `motion` to `cursor`, adjusting `scroll` at the top/left edges.
///
/// `size` is only consulted for the page length.
pub fn move_cursor(
    motion: Motion,
    cursor: &mut Position,
    scroll: &mut Position,
    size: Size,
    lines: &LineBuffer,
) {
    match motion {
        Motion::Left => {
            if cursor.col == 0 {
                scroll.col = scroll.col.saturating_sub(1);
            } else {
                cursor.col -= 1;
            }
        }
        Motion::Right => {
            if cursor.col < lines.line_len(cursor.row) {
                cursor.col += 1;
            }
        }
        Motion::Up => {
            if cursor.row == 0 {
                scroll.row = scroll.row.saturating_sub(1);
            } else {
                cursor.row -= 1;
            }
            snap_to_line(cursor, lines);
        }
        Motion::Down => {
            if cursor.row < lines.len() {
                cursor.row += 1;
            }
            snap_to_line(cursor, lines);
        }
        Motion::PageUp | Motion::PageDown => {
            let step = if motion == Motion::PageUp {
                Motion::Up
            } else {
                Motion::Down
            };
            for _ in 0..size.rows {
                move_cursor(step, cursor, scroll, size, lines);
            }
        }
        Motion::Home => cursor.col = 0,
        Motion::End => cursor.col = lines.line_len(cursor.row),
    }
}

/// Pull the column back to the end of the cursor's line.
fn snap_to_line(cursor: &mut Position, lines: &LineBuffer) {
    cursor.col = cursor.col.min(lines.line_len(cursor.row));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
