// SPDX-License-Identifier: MIT
//
// Key decoder.
//
// Turns raw stdin bytes into logical key events: printable characters,
// control characters, and the named keys legacy terminals encode as
// escape sequences (arrows, Home/End, Page Up/Down, Delete).
//
// # Design
//
// Decoding is an explicit state machine with one transition function,
// [`State::advance`]. The decoder pulls bytes from a [`ByteSource`] and
// feeds them through the table until it emits a key.
//
// A bare `ESC` byte (0x1B) is ambiguous: it could be the Escape key or the
// first byte of a sequence. The source's bounded read wait resolves it: if
// no continuation byte arrives in time, the pending state collapses to a
// literal Escape. Unrecognized continuations collapse the same way, so
// decoding never fails and never waits past one read timeout per byte.
// An `ESC` arriving mid-sequence is never part of the pending sequence: it
// resolves that one to Escape and is kept back to open the next key.
//
// Recognized sequences:
//
// ```text
// ESC [ A/B/C/D      Up / Down / Right / Left
// ESC [ H / ESC [ F  Home / End
// ESC O H / ESC O F  Home / End (alternate dialect)
// ESC [ 1~ 7~        Home
// ESC [ 4~ 8~        End
// ESC [ 3~           Delete
// ESC [ 5~ / 6~      Page Up / Page Down
// ```

use std::io;

use bitflags::bitflags;

use crate::reader::ByteSource;

/// The escape byte that opens every multi-byte sequence.
pub const ESC: u8 = 0x1B;

// ─── Event Types ────────────────────────────────────────────────────────────

/// A decoded keystroke: key identity plus modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// Which key was pressed.
    pub code: KeyCode,
    /// Active modifier keys. Only Ctrl is recoverable from legacy bytes.
    pub modifiers: Modifiers,
}

/// Identity of a key.
///
/// Named keys have dedicated variants; printable ASCII uses
/// [`Char`](KeyCode::Char). Bytes at or above 0x80 are passed through as
/// [`Byte`](KeyCode::Byte) — kilt does not assemble UTF-8 input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// An ASCII character. With [`Modifiers::CTRL`], the letter of a
    /// control byte (`Ctrl-Q` is `Char('q')`).
    Char(char),
    /// A non-ASCII byte, delivered as-is.
    Byte(u8),
    // ── Named keys ──────────────────────────────────────────────
    Enter,
    Tab,
    Backspace,
    Escape,
    Delete,
    // ── Navigation ──────────────────────────────────────────────
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

bitflags! {
    /// Keyboard modifier flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const CTRL = 1;
    }
}

impl KeyEvent {
    /// A key with no modifiers.
    #[inline]
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    /// A Ctrl+letter key, as produced by the byte `letter & 0x1f`.
    #[inline]
    #[must_use]
    pub const fn ctrl(letter: char) -> Self {
        Self {
            code: KeyCode::Char(letter),
            modifiers: Modifiers::CTRL,
        }
    }

    /// Decode a single byte that is not part of an escape sequence.
    ///
    /// Control bytes map to Ctrl+letter except for the four that terminals
    /// send for dedicated keys: 0x08 / 0x7F (Backspace), 0x09 (Tab),
    /// 0x0A / 0x0D (Enter). A lone 0x1B decodes to Escape.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        match byte {
            0x08 | 0x7F => Self::plain(KeyCode::Backspace),
            0x09 => Self::plain(KeyCode::Tab),
            0x0A | 0x0D => Self::plain(KeyCode::Enter),
            ESC => Self::plain(KeyCode::Escape),
            0x00 => Self::ctrl('@'),
            b @ 0x01..=0x1A => Self::ctrl((b + b'a' - 1) as char),
            b @ 0x1C..=0x1F => Self::ctrl((b + 0x40) as char),
            b @ 0x20..=0x7E => Self::plain(KeyCode::Char(b as char)),
            b => Self::plain(KeyCode::Byte(b)),
        }
    }

    /// Whether this is Ctrl+`letter`.
    #[inline]
    #[must_use]
    pub fn is_ctrl(self, letter: char) -> bool {
        self.code == KeyCode::Char(letter) && self.modifiers.contains(Modifiers::CTRL)
    }
}

// ─── State Machine ──────────────────────────────────────────────────────────

/// Position inside a (possible) escape sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Nothing consumed yet.
    Start,
    /// Consumed `ESC`.
    SawEscape,
    /// Consumed `ESC [`.
    SawBracket,
    /// Consumed `ESC [ <digit>`; waiting for the closing `~`.
    SawDigit(u8),
    /// Consumed `ESC O`.
    SawSs3,
}

/// Outcome of feeding one byte to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The bytes so far form a complete key.
    Emit(KeyEvent),
    /// More bytes are needed.
    Next(State),
    /// The pending bytes resolve to this key; the byte just fed is not
    /// part of it and starts the next key.
    Retry(KeyEvent),
}

const ESCAPE: KeyEvent = KeyEvent::plain(KeyCode::Escape);

impl State {
    /// The transition table.
    #[must_use]
    pub const fn advance(self, byte: u8) -> Step {
        match self {
            Self::Start => match byte {
                ESC => Step::Next(Self::SawEscape),
                b => Step::Emit(KeyEvent::from_byte(b)),
            },
            Self::SawEscape | Self::SawBracket | Self::SawDigit(_) | Self::SawSs3
                if byte == ESC =>
            {
                Step::Retry(ESCAPE)
            }
            Self::SawEscape => match byte {
                b'[' => Step::Next(Self::SawBracket),
                b'O' => Step::Next(Self::SawSs3),
                _ => Step::Emit(ESCAPE),
            },
            Self::SawBracket => match byte {
                b @ b'0'..=b'9' => Step::Next(Self::SawDigit(b)),
                b'A' => Step::Emit(KeyEvent::plain(KeyCode::Up)),
                b'B' => Step::Emit(KeyEvent::plain(KeyCode::Down)),
                b'C' => Step::Emit(KeyEvent::plain(KeyCode::Right)),
                b'D' => Step::Emit(KeyEvent::plain(KeyCode::Left)),
                b'H' => Step::Emit(KeyEvent::plain(KeyCode::Home)),
                b'F' => Step::Emit(KeyEvent::plain(KeyCode::End)),
                _ => Step::Emit(ESCAPE),
            },
            Self::SawDigit(digit) => {
                if byte != b'~' {
                    return Step::Emit(ESCAPE);
                }
                let code = match digit {
                    b'1' | b'7' => KeyCode::Home,
                    b'3' => KeyCode::Delete,
                    b'4' | b'8' => KeyCode::End,
                    b'5' => KeyCode::PageUp,
                    b'6' => KeyCode::PageDown,
                    _ => KeyCode::Escape,
                };
                Step::Emit(KeyEvent::plain(code))
            }
            Self::SawSs3 => match byte {
                b'H' => Step::Emit(KeyEvent::plain(KeyCode::Home)),
                b'F' => Step::Emit(KeyEvent::plain(KeyCode::End)),
                _ => Step::Emit(ESCAPE),
            },
        }
    }

    /// What a read timeout means in this state.
    ///
    /// At [`Start`](Self::Start) nothing is pending and the caller keeps
    /// waiting. Anywhere else the partial sequence resolves to Escape.
    #[must_use]
    pub const fn timeout(self) -> Option<KeyEvent> {
        match self {
            Self::Start => None,
            _ => Some(ESCAPE),
        }
    }
}

// ─── Decoder ────────────────────────────────────────────────────────────────

/// Pulls bytes from a [`ByteSource`] and yields one [`KeyEvent`] per call.
#[derive(Debug)]
pub struct Decoder<S> {
    src: S,
    /// A byte read but left for the next key (see [`Step::Retry`]).
    held: Option<u8>,
}

impl<S: ByteSource> Decoder<S> {
    /// Wrap a byte source.
    pub const fn new(src: S) -> Self {
        Self { src, held: None }
    }

    /// Unwrap the source. A held-back byte is dropped.
    pub fn into_inner(self) -> S {
        self.src
    }

    /// Decode the next key, or `None` if the first read timed out.
    ///
    /// Once a byte has arrived this never returns `None`: a timeout mid
    /// sequence yields Escape.
    ///
    /// # Errors
    ///
    /// Returns an error if the source read fails.
    pub fn try_read_key(&mut self) -> io::Result<Option<KeyEvent>> {
        let mut state = State::Start;
        loop {
            let byte = match self.held.take() {
                Some(byte) => byte,
                None => match self.src.read_byte()? {
                    Some(byte) => byte,
                    None => return Ok(state.timeout()),
                },
            };
            match state.advance(byte) {
                Step::Emit(key) => return Ok(Some(key)),
                Step::Next(next) => state = next,
                Step::Retry(key) => {
                    self.held = Some(byte);
                    return Ok(Some(key));
                }
            }
        }
    }

    /// Block until a key arrives.
    ///
    /// # Errors
    ///
    /// Returns an error if the source read fails.
    pub fn read_key(&mut self) -> io::Result<KeyEvent> {
        loop {
            if let Some(key) = self.try_read_key()? {
                return Ok(key);
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
