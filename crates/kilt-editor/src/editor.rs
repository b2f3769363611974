//! Editor — the session state and its key dispatch.
//!
//! `Editor` owns everything one session needs: the document, the cursor,
//! the scroll offset, the screen size and the typed-quit matcher. It plugs
//! into [`EventLoop`](kilt_term::event_loop::EventLoop) through the
//! [`App`] trait: `render` reconciles the viewport and composes a frame,
//! `on_key` dispatches one decoded key.

use std::path::Path;

use kilt_term::event_loop::{Action, App};
use kilt_term::input::KeyEvent;
use kilt_term::output::OutputBuffer;
use kilt_term::terminal::Size;
use tracing::{trace, warn};

use crate::buffer::LineBuffer;
use crate::cursor::{Motion, move_cursor};
use crate::error::Result;
use crate::position::Position;
use crate::quit::QuitSequence;
use crate::render::compose_frame;
use crate::view::reconcile;

/// The key that quits at once.
pub const QUIT_KEY: char = 'q';

/// Root state of one viewing session.
#[derive(Debug, Clone)]
pub struct Editor {
    lines: LineBuffer,
    cursor: Position,
    scroll: Position,
    size: Size,
    quit: QuitSequence,
}

impl Editor {
    /// An editor over an empty buffer, sized to the terminal.
    #[must_use]
    pub const fn new(size: Size) -> Self {
        Self::with_lines(size, LineBuffer::new())
    }

    /// An editor over an already-loaded buffer.
    #[must_use]
    pub const fn with_lines(size: Size, lines: LineBuffer) -> Self {
        Self {
            lines,
            cursor: Position::ZERO,
            scroll: Position::ZERO,
            size,
            quit: QuitSequence::new(),
        }
    }

    /// Load `path` into the buffer, replacing whatever was there.
    ///
    /// # Errors
    ///
    /// Returns the load error; the editor is left unchanged.
    pub fn open(&mut self, path: &Path) -> Result<()> {
        self.lines = LineBuffer::load(path)?;
        self.cursor = Position::ZERO;
        self.scroll = Position::ZERO;
        Ok(())
    }

    #[must_use]
    pub const fn lines(&self) -> &LineBuffer {
        &self.lines
    }

    #[must_use]
    pub const fn cursor(&self) -> Position {
        self.cursor
    }

    /// Current scroll offset (`row_offset`, `col_offset`).
    #[must_use]
    pub const fn scroll_offset(&self) -> Position {
        self.scroll
    }

    /// Slide the viewport so the cursor is on screen.
    pub fn scroll(&mut self) {
        self.scroll = reconcile(self.cursor, self.size, self.scroll);
    }

    /// Handle one key: quit, move, or ignore.
    pub fn dispatch(&mut self, key: KeyEvent) -> Action {
        if key.is_ctrl(QUIT_KEY) || self.quit.feed(key) {
            return Action::Quit;
        }
        if let Some(motion) = Motion::from_key(key.code) {
            move_cursor(
                motion,
                &mut self.cursor,
                &mut self.scroll,
                self.size,
                &self.lines,
            );
            trace!(?motion, cursor = %self.cursor, "moved");
        }
        Action::Continue
    }
}

impl App for Editor {
    fn render(&mut self, out: &mut OutputBuffer) {
        self.scroll();
        if let Err(err) = compose_frame(out, &self.lines, self.cursor, self.scroll, self.size) {
            warn!(%err, "frame composition failed");
        }
    }

    fn on_key(&mut self, key: KeyEvent) -> Action {
        self.dispatch(key)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use kilt_term::event_loop::EventLoop;
    use kilt_term::input::KeyCode;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const SCREEN: Size = Size::new(24, 80);

    fn editor_with(n: usize, width: usize) -> Editor {
        let mut lines = LineBuffer::new();
        for _ in 0..n {
            lines.append_line("x".repeat(width));
        }
        Editor::with_lines(SCREEN, lines)
    }

    /// Run a session over `input` and return the editor and everything
    /// written to the screen.
    fn session(mut editor: Editor, input: &[u8]) -> (Editor, Vec<u8>) {
        let mut event_loop = EventLoop::new(input, Vec::new());
        event_loop.run(&mut editor).unwrap();
        let (_, out) = event_loop.into_parts();
        (editor, out)
    }

    // -- dispatch -----------------------------------------------------------

    #[test]
    fn ctrl_q_quits() {
        let mut ed = editor_with(3, 3);
        assert_eq!(ed.dispatch(KeyEvent::ctrl('q')), Action::Quit);
    }

    #[test]
    fn typed_quit_sequence_quits() {
        let mut ed = editor_with(3, 3);
        assert_eq!(ed.dispatch(KeyEvent::plain(KeyCode::Char(':'))), Action::Continue);
        assert_eq!(ed.dispatch(KeyEvent::plain(KeyCode::Char('q'))), Action::Continue);
        assert_eq!(ed.dispatch(KeyEvent::plain(KeyCode::Enter)), Action::Quit);
    }

    #[test]
    fn unbound_keys_are_ignored() {
        let mut ed = editor_with(3, 3);
        for key in [
            KeyEvent::plain(KeyCode::Char('j')),
            KeyEvent::plain(KeyCode::Delete),
            KeyEvent::plain(KeyCode::Escape),
            KeyEvent::ctrl('s'),
        ] {
            assert_eq!(ed.dispatch(key), Action::Continue);
        }
        assert_eq!(ed.cursor(), Position::ZERO);
        assert_eq!(ed.scroll_offset(), Position::ZERO);
    }

    #[test]
    fn arrows_move_the_cursor() {
        let mut ed = editor_with(3, 10);
        ed.dispatch(KeyEvent::plain(KeyCode::Down));
        ed.dispatch(KeyEvent::plain(KeyCode::Right));
        ed.dispatch(KeyEvent::plain(KeyCode::Right));
        assert_eq!(ed.cursor(), Position::new(1, 2));
    }

    // -- scroll -------------------------------------------------------------

    #[test]
    fn scroll_follows_cursor_down() {
        let mut ed = editor_with(100, 1);
        for _ in 0..30 {
            ed.dispatch(KeyEvent::plain(KeyCode::Down));
        }
        ed.scroll();
        assert_eq!(ed.scroll_offset().row, 7);
    }

    #[test]
    fn scroll_follows_cursor_right() {
        let mut ed = editor_with(1, 200);
        ed.dispatch(KeyEvent::plain(KeyCode::End));
        ed.scroll();
        assert_eq!(ed.scroll_offset().col, 121);
    }

    #[test]
    fn left_and_up_at_origin_leave_reconciled_offset_alone() {
        let mut ed = editor_with(100, 200);
        ed.dispatch(KeyEvent::plain(KeyCode::End));
        ed.scroll();
        assert_eq!(ed.scroll_offset().col, 121);
        ed.dispatch(KeyEvent::plain(KeyCode::Home));
        ed.scroll();
        assert_eq!(ed.scroll_offset(), Position::ZERO);

        ed.dispatch(KeyEvent::plain(KeyCode::Left));
        ed.dispatch(KeyEvent::plain(KeyCode::Up));
        ed.scroll();
        assert_eq!(ed.cursor(), Position::ZERO);
        assert_eq!(ed.scroll_offset(), Position::ZERO);
    }

    // -- open ---------------------------------------------------------------

    #[test]
    fn open_loads_file_and_resets_cursor() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "first").unwrap();
        writeln!(file, "second").unwrap();

        let mut ed = editor_with(50, 5);
        ed.dispatch(KeyEvent::plain(KeyCode::PageDown));
        ed.open(file.path()).unwrap();

        assert_eq!(ed.lines().len(), 2);
        assert_eq!(ed.cursor(), Position::ZERO);
        assert_eq!(ed.lines().line(1).unwrap().as_bytes(), b"second");
    }

    #[test]
    fn open_missing_file_keeps_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut ed = editor_with(4, 4);
        ed.dispatch(KeyEvent::plain(KeyCode::Down));

        assert!(ed.open(&dir.path().join("missing")).is_err());
        assert_eq!(ed.lines().len(), 4);
        assert_eq!(ed.cursor(), Position::new(1, 0));
    }

    // -- whole sessions -----------------------------------------------------

    #[test]
    fn quit_key_clears_screen_and_homes() {
        let (_, out) = session(editor_with(5, 3), b"\x11");
        assert!(out.ends_with(b"\x1b[2J\x1b[H"));
    }

    #[test]
    fn quit_sequence_ends_session() {
        let (_, out) = session(editor_with(5, 3), b":q\r");
        assert!(out.ends_with(b"\x1b[2J\x1b[H"));
    }

    #[test]
    fn first_frame_is_drawn_before_any_key() {
        let (_, out) = session(editor_with(2, 3), b"\x11");
        assert!(out.starts_with(b"\x1b[?25l\x1b[Hxxx\x1b[K\r\nxxx\x1b[K\r\n~\x1b[K"));
    }

    #[test]
    fn frame_tracks_cursor_after_keys() {
        let (ed, out) = session(editor_with(5, 10), b"\x1b[B\x1b[B\x1b[C\x11");
        assert_eq!(ed.cursor(), Position::new(2, 1));
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\x1b[3;2H\x1b[?25h"));
    }

    #[test]
    fn page_down_past_screen_scrolls_frame() {
        let (ed, out) = session(editor_with(100, 4), b"\x1b[6~\x1b[6~\x11");
        assert_eq!(ed.cursor().row, 48);
        assert_eq!(ed.scroll_offset().row, 25);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\x1b[24;1H\x1b[?25h"));
    }

    #[test]
    fn empty_session_shows_welcome() {
        let (_, out) = session(Editor::new(SCREEN), b"\x11");
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(crate::render::WELCOME));
    }
}
