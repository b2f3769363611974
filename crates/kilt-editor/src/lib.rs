//! # kilt-editor — Document and view model for kilt
//!
//! This crate holds everything between the raw terminal and the file:
//!
//! - **[`position`]** — `Position` (row, col), 0-indexed, for cursor and scroll
//! - **[`buffer`]** — `LineBuffer`, the file as a list of byte lines
//! - **[`view`]** — keeping the cursor inside the viewport
//! - **[`cursor`]** — arrow, page and Home/End motions with their clamps
//! - **[`render`]** — composing a full frame into one output buffer
//! - **[`quit`]** — the typed `:q` quit sequence
//! - **[`editor`]** — `Editor`, the session state that drives the event loop
//!
//! Terminal I/O lives in `kilt-term`; nothing here touches a file
//! descriptor except [`LineBuffer::load`](buffer::LineBuffer::load).

pub mod buffer;
pub mod cursor;
pub mod editor;
pub mod error;
pub mod position;
pub mod quit;
pub mod render;
pub mod view;

pub use error::{Error, Result};
