// SPDX-License-Identifier: MIT
//
// kilt-term — Terminal layer for kilt.
//
// Raw-mode session, key decoding, and single-write frame output over
// plain ANSI/VT100 escape sequences and termios. No TUI framework sits
// between kilt and the terminal: every byte that goes out is written by
// `ansi`, and every byte that comes in goes through `input`.

pub mod ansi;
pub mod error;
pub mod event_loop;
pub mod input;
pub mod output;
pub mod reader;
pub mod terminal;

pub use error::{Error, Result};
