//! Screen compositor — turning buffer and viewport into one frame.
//!
//! A frame is a complete repaint, built in memory and handed to the
//! terminal in a single write:
//!
//! ```text
//!   ESC[?25l  ESC[H                      hide cursor, go home
//!   row 0     ESC[K  \r\n                 content or "~", clear the rest
//!   ...
//!   row n-1   ESC[K                       last row has no line break
//!   ESC[r;cH  ESC[?25h                   place the cursor, show it
//! ```
//!
//! Rows are never erased in full; `ESC[K` after the content clears only
//! what the previous frame left to the right of it. Line bytes are copied
//! through as-is, one byte per cell.

use std::io::{self, Write};

use kilt_term::ansi;
use kilt_term::terminal::Size;

use crate::buffer::LineBuffer;
use crate::position::Position;

/// Banner shown on an empty buffer.
pub const WELCOME: &str = concat!("Kilt editor -- version ", env!("CARGO_PKG_VERSION"));

/// Marker drawn on rows past the end of the document.
const EMPTY_ROW: &[u8] = b"~";

/// Compose one frame into `out`.
///
/// `scroll` must already be reconciled against `cursor`, so the cursor is
/// inside the window.
///
/// # Errors
///
/// Returns any error from `out`. Writing into an
/// [`OutputBuffer`](kilt_term::output::OutputBuffer) never fails.
pub fn compose_frame(
    out: &mut impl Write,
    lines: &LineBuffer,
    cursor: Position,
    scroll: Position,
    size: Size,
) -> io::Result<()> {
    ansi::cursor_hide(out)?;
    ansi::cursor_home(out)?;

    let rows = usize::from(size.rows);
    for y in 0..rows {
        draw_row(out, lines, y, scroll, size)?;
        ansi::clear_line(out)?;
        if y + 1 < rows {
            out.write_all(b"\r\n")?;
        }
    }

    let on_screen = cursor.relative_to(scroll);
    ansi::cursor_to(out, on_screen.row, on_screen.col)?;
    ansi::cursor_show(out)
}

fn draw_row(
    out: &mut impl Write,
    lines: &LineBuffer,
    y: usize,
    scroll: Position,
    size: Size,
) -> io::Result<()> {
    let cols = usize::from(size.cols);
    match lines.line(y + scroll.row) {
        Some(line) => out.write_all(line.visible(scroll.col, cols)),
        None if lines.is_empty() && y == usize::from(size.rows) / 3 => draw_welcome(out, cols),
        None => out.write_all(EMPTY_ROW),
    }
}

/// The welcome banner, centered and truncated to `cols`.
fn draw_welcome(out: &mut impl Write, cols: usize) -> io::Result<()> {
    let text = &WELCOME.as_bytes()[..WELCOME.len().min(cols)];
    let padding = (cols - text.len()) / 2;
    if padding > 0 {
        out.write_all(EMPTY_ROW)?;
        out.write_all(&b" ".repeat(padding - 1))?;
    }
    out.write_all(text)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
