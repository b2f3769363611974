//! Typed quit — `:` `q` Enter.
//!
//! Ctrl-Q quits immediately; this is the second way out. Keys are fed one
//! at a time and the matcher remembers how far into `:q⏎` it has got. Any
//! key that does not continue the sequence starts it over, except `:`,
//! which always begins a fresh attempt.

use kilt_term::input::{KeyCode, KeyEvent};

/// Progress through the `:q` + Enter sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuitSequence {
    matched: u8,
}

impl QuitSequence {
    /// A matcher with nothing typed yet.
    #[must_use]
    pub const fn new() -> Self {
        Self { matched: 0 }
    }

    /// Feed one key. Returns `true` when it completes the sequence.
    pub fn feed(&mut self, key: KeyEvent) -> bool {
        if !key.modifiers.is_empty() {
            self.matched = 0;
            return false;
        }
        self.matched = match (self.matched, key.code) {
            (_, KeyCode::Char(':')) => 1,
            (1, KeyCode::Char('q')) => 2,
            (2, KeyCode::Enter) => {
                self.matched = 0;
                return true;
            }
            _ => 0,
        };
        false
    }

    /// How many keys of the sequence have been typed so far.
    #[cfg(test)]
    const fn progress(&self) -> u8 {
        self.matched
    }
}
