// SPDX-License-Identifier: MIT
//
// Event loop — the session heartbeat.
//
// Single-threaded and blocking: render a frame, wait for one key, hand it
// to the application, repeat. The only wait is the terminal's bounded read
// (VTIME), so an idle loop sits in `read()` and re-polls every 100ms
// without redrawing.
//
// Rendering goes through one `OutputBuffer`, flushed with a single write
// per frame. A failed or short write is logged and tolerated — the next
// frame repaints everything anyway.
//
// On quit the loop clears the screen and homes the cursor before
// returning, so the shell prompt comes back on a clean screen.

use std::io::Write;

use tracing::{debug, trace, warn};

use crate::ansi;
use crate::error::{Error, Result};
use crate::input::{Decoder, KeyEvent};
use crate::output::OutputBuffer;
use crate::reader::ByteSource;

// ─── App Trait ───────────────────────────────────────────────────────────────

/// What the application tells the event loop to do after handling a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Continue running.
    Continue,
    /// Exit the event loop cleanly.
    Quit,
}

/// Application interface for the event loop.
///
/// Each cycle the loop calls [`render`](App::render), flushes the frame,
/// reads one key, and passes it to [`on_key`](App::on_key).
pub trait App {
    /// Compose the whole frame into `out`.
    ///
    /// `out` is empty on entry. Everything appended is written to the
    /// terminal in one write.
    fn render(&mut self, out: &mut OutputBuffer);

    /// Handle one decoded key.
    ///
    /// Return [`Action::Quit`] to exit the event loop.
    fn on_key(&mut self, key: KeyEvent) -> Action;
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// The terminal event loop.
///
/// Owns the key decoder, the frame buffer and the output sink. Generic
/// over both ends so tests drive it with a byte slice and a `Vec<u8>`.
///
/// # Example
///
/// ```no_run
/// use kilt_term::event_loop::{Action, App, EventLoop};
/// use kilt_term::input::KeyEvent;
/// use kilt_term::output::{OutputBuffer, StdoutSink};
/// use kilt_term::reader::StdinSource;
///
/// struct Blank;
///
/// impl App for Blank {
///     fn render(&mut self, out: &mut OutputBuffer) {
///         out.append(b"\x1b[H");
///     }
///
///     fn on_key(&mut self, key: KeyEvent) -> Action {
///         if key.is_ctrl('q') { Action::Quit } else { Action::Continue }
///     }
/// }
///
/// EventLoop::new(StdinSource::new(), StdoutSink::new()).run(&mut Blank)?;
/// # Ok::<(), kilt_term::Error>(())
/// ```
#[derive(Debug)]
pub struct EventLoop<S, W> {
    decoder: Decoder<S>,
    out: W,
    frame: OutputBuffer,
}

impl<S: ByteSource, W: Write> EventLoop<S, W> {
    /// Create a loop reading keys from `src` and writing frames to `out`.
    pub fn new(src: S, out: W) -> Self {
        Self {
            decoder: Decoder::new(src),
            out,
            frame: OutputBuffer::new(),
        }
    }

    /// Run until the application returns [`Action::Quit`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Read`] if the input device fails, or [`Error::Io`]
    /// if the final clear-screen cannot be written.
    pub fn run(&mut self, app: &mut impl App) -> Result<()> {
        loop {
            self.refresh(app);

            let key = self.decoder.read_key().map_err(Error::Read)?;
            trace!(?key, "key");

            if app.on_key(key) == Action::Quit {
                debug!("quit requested");
                return self.shutdown();
            }
        }
    }

    /// Compose one frame and write it to the terminal in a single write.
    pub fn refresh(&mut self, app: &mut impl App) {
        self.frame.clear();
        app.render(&mut self.frame);
        if let Err(err) = self.frame.flush_to(&mut self.out) {
            warn!(%err, "frame write failed");
        }
    }

    /// Take back the source and sink.
    pub fn into_parts(self) -> (S, W) {
        (self.decoder.into_inner(), self.out)
    }

    fn shutdown(&mut self) -> Result<()> {
        ansi::clear_and_home(&mut self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
