// SPDX-License-Identifier: MIT
//
// Terminal control — raw mode, window size, and RAII cleanup.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr) and ioctl (TIOCGWINSZ). These are the standard POSIX
// interfaces for terminal control — there is no safe alternative. Each
// unsafe block is minimal.
#![allow(unsafe_code)]
//
// This module owns the terminal's raw state. `enable()` captures the
// current termios, then switches off line buffering, echo, signal keys,
// flow control, CR translation and output post-processing, and sets a
// VMIN=0 / VTIME=1 read policy (return what is there, or nothing after
// 100ms). Restoration is guaranteed three ways: `disable()`, `Drop`, and a
// panic hook that restores from a global backup of the saved termios.
//
// Window size comes from `ioctl(TIOCGWINSZ)`. When that fails or reports
// zero columns, we push the cursor into the bottom-right corner and ask
// the terminal where it ended up.

use std::fmt;
use std::io::{self, Write};
#[cfg(unix)]
use std::sync::Mutex;
use std::sync::Once;

use tracing::{debug, info};

use crate::ansi;
use crate::error::{Error, Result};
use crate::reader::ByteSource;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Number of rows (height in character cells).
    pub rows: u16,
    /// Number of columns (width in character cells).
    pub cols: u16,
}

impl Size {
    /// Build a size from rows and columns.
    #[inline]
    #[must_use]
    pub const fn new(rows: u16, cols: u16) -> Self {
        Self { rows, cols }
    }
}

// ─── Terminal Queries ───────────────────────────────────────────────────────

/// Query the current terminal size via `ioctl(TIOCGWINSZ)`.
///
/// Returns `None` if stdout is not a terminal, the query fails, or the
/// terminal reports zero columns.
#[cfg(unix)]
#[must_use]
pub fn ioctl_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &raw mut ws) };

    if result == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Some(Size::new(ws.ws_row, ws.ws_col))
    } else {
        None
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn ioctl_size() -> Option<Size> {
    None
}

/// Longest cursor report we are willing to read.
const REPORT_MAX: usize = 31;

/// Parse a cursor position report of the form `ESC [ rows ; cols R`.
///
/// `reply` may or may not include the trailing `R`. Returns `None` for
/// anything else, including zero or out-of-range numbers.
#[must_use]
pub fn parse_cursor_report(reply: &[u8]) -> Option<Size> {
    let body = reply.strip_prefix(b"\x1b[")?;
    let body = body.strip_suffix(b"R").unwrap_or(body);
    let text = std::str::from_utf8(body).ok()?;
    let (rows, cols) = text.split_once(';')?;
    let rows: u16 = rows.parse().ok()?;
    let cols: u16 = cols.parse().ok()?;
    (rows > 0 && cols > 0).then_some(Size::new(rows, cols))
}

/// Discover the size by moving the cursor to the far corner and asking
/// the terminal to report its position.
///
/// Reads the reply byte by byte until `R`, a timeout, or [`REPORT_MAX`]
/// bytes — whichever comes first.
///
/// # Errors
///
/// Returns [`Error::Io`] if the query cannot be written, [`Error::Read`]
/// if reading the reply fails, and [`Error::WindowSize`] if the reply is
/// missing or malformed.
pub fn query_size_via_cursor(src: &mut impl ByteSource, out: &mut impl Write) -> Result<Size> {
    ansi::cursor_to_far_corner(out)?;
    ansi::query_cursor_position(out)?;
    out.flush()?;

    let mut reply = Vec::with_capacity(REPORT_MAX);
    while reply.len() < REPORT_MAX {
        match src.read_byte().map_err(Error::Read)? {
            Some(b'R') | None => break,
            Some(byte) => reply.push(byte),
        }
    }

    parse_cursor_report(&reply).ok_or(Error::WindowSize)
}

/// Current window size: the ioctl first, the cursor report as fallback.
///
/// # Errors
///
/// Returns [`Error::WindowSize`] if neither strategy yields a size.
pub fn window_size(src: &mut impl ByteSource, out: &mut impl Write) -> Result<Size> {
    if let Some(size) = ioctl_size() {
        debug!(rows = size.rows, cols = size.cols, "window size from ioctl");
        return Ok(size);
    }
    let size = query_size_via_cursor(src, out)?;
    debug!(rows = size.rows, cols = size.cols, "window size from cursor report");
    Ok(size)
}

// ─── Restore On Panic ───────────────────────────────────────────────────────

/// Copy of the attributes captured by the active [`Terminal`].
///
/// The panic hook has no handle on the `Terminal`, so `enable` parks a
/// second copy here and `disable` takes it back out.
#[cfg(unix)]
static SAVED_ATTRS: Mutex<Option<libc::termios>> = Mutex::new(None);

/// Put the saved attributes back, if any. Errors are dropped.
#[cfg(unix)]
fn restore_saved_attrs() {
    let Ok(saved) = SAVED_ATTRS.lock() else {
        return;
    };
    if let Some(attrs) = saved.as_ref() {
        unsafe {
            let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, attrs);
        }
    }
}

static HOOK: Once = Once::new();

/// Chain a hook in front of the default panic handler that wipes the
/// screen and leaves raw mode, so the panic message lands on a usable
/// terminal. Installed once per process.
fn install_panic_hook() {
    HOOK.call_once(|| {
        let default_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let mut stdout = io::stdout();
            let _ = ansi::clear_and_home(&mut stdout);
            let _ = stdout.flush();

            #[cfg(unix)]
            restore_saved_attrs();

            default_hook(info);
        }));
    });
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// Raw-mode session with RAII cleanup.
///
/// Call [`enable`](Self::enable) to switch to raw mode. The saved
/// attributes are restored by [`disable`](Self::disable) or when the
/// handle is dropped — even on panic.
///
/// # Example
///
/// ```no_run
/// use kilt_term::terminal::Terminal;
///
/// let mut term = Terminal::new();
/// term.enable()?;
/// // ... render frames, read keys ...
/// // Terminal is restored automatically on drop.
/// # Ok::<(), kilt_term::Error>(())
/// ```
pub struct Terminal {
    /// Original termios saved before entering raw mode.
    #[cfg(unix)]
    original_termios: Option<libc::termios>,

    /// Whether raw mode is currently applied.
    active: bool,
}

impl Terminal {
    /// Create an inactive terminal handle.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            #[cfg(unix)]
            original_termios: None,
            active: false,
        }
    }

    /// Whether raw mode is active.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Capture the current attributes and switch to raw mode.
    ///
    /// Idempotent: calling `enable()` while already active is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GetAttr`] if the current attributes cannot be read
    /// (stdin is not a terminal) and [`Error::SetAttr`] if raw mode cannot
    /// be applied.
    pub fn enable(&mut self) -> Result<()> {
        if self.active {
            return Ok(());
        }

        install_panic_hook();
        self.enable_raw_mode()?;
        self.active = true;
        info!("raw mode enabled");
        Ok(())
    }

    /// Restore the attributes captured by [`enable`](Self::enable).
    ///
    /// Idempotent: calling `disable()` while inactive is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SetAttr`] if the attributes cannot be restored.
    pub fn disable(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }

        self.disable_raw_mode()?;
        self.active = false;
        info!("terminal restored");
        Ok(())
    }

    // ── Raw Mode (termios) ──────────────────────────────────────────

    #[cfg(unix)]
    fn enable_raw_mode(&mut self) -> Result<()> {
        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(libc::STDIN_FILENO, &raw mut termios) != 0 {
                return Err(Error::GetAttr(io::Error::last_os_error()));
            }

            // Kept for disable() and Drop.
            self.original_termios = Some(termios);

            // And for the panic hook.
            if let Ok(mut guard) = SAVED_ATTRS.lock() {
                *guard = Some(termios);
            }

            // No break-to-SIGINT, no CR→NL, no parity check, no 8th-bit
            // strip, no Ctrl-S/Ctrl-Q flow control.
            termios.c_iflag &=
                !(libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON);
            // No "\n" → "\r\n" on output; frames carry explicit "\r\n".
            termios.c_oflag &= !libc::OPOST;
            termios.c_cflag |= libc::CS8;
            // No echo, byte-at-a-time input, no Ctrl-V, no Ctrl-C/Ctrl-Z signals.
            termios.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);

            // VMIN=0, VTIME=1: read() returns after 100ms with nothing.
            termios.c_cc[libc::VMIN] = 0;
            termios.c_cc[libc::VTIME] = 1;

            if libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const termios) != 0 {
                return Err(Error::SetAttr(io::Error::last_os_error()));
            }
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn enable_raw_mode(&mut self) -> Result<()> {
        Err(Error::GetAttr(io::Error::new(
            io::ErrorKind::Unsupported,
            "raw mode requires a unix terminal",
        )))
    }

    #[cfg(unix)]
    fn disable_raw_mode(&mut self) -> Result<()> {
        if let Some(ref original) = self.original_termios {
            unsafe {
                if libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, original) != 0 {
                    return Err(Error::SetAttr(io::Error::last_os_error()));
                }
            }

            // Nothing left for the panic hook to undo.
            if let Ok(mut guard) = SAVED_ATTRS.lock() {
                *guard = None;
            }

            self.original_termios = None;
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn disable_raw_mode(&mut self) -> Result<()> {
        Ok(())
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Terminal")
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.active {
            let _ = self.disable();
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
