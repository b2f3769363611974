//! Line buffer — the document model.
//!
//! A `LineBuffer` is an ordered list of lines; the index of a line is its
//! line number. Lines hold raw bytes exactly as they appear in the file,
//! minus their trailing `\n` / `\r` terminators. Nothing is decoded: a file
//! that is not valid UTF-8 loads and displays byte for byte.
//!
//! Lines are only ever appended, during the single load pass at startup.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use tracing::info;

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Line
// ---------------------------------------------------------------------------

/// One line of the document, without its terminator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Line {
    bytes: Vec<u8>,
}

impl Line {
    /// The line's content.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Length in bytes (and so in screen cells).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the line is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The part of the line visible through a window starting at column
    /// `from` and `width` cells wide.
    ///
    /// Empty when the window starts at or past the end of the line.
    #[must_use]
    pub fn visible(&self, from: usize, width: usize) -> &[u8] {
        let start = from.min(self.bytes.len());
        let end = start.saturating_add(width).min(self.bytes.len());
        &self.bytes[start..end]
    }
}

/// Drop every trailing `\n` and `\r`.
fn strip_terminators(mut bytes: Vec<u8>) -> Vec<u8> {
    while matches!(bytes.last(), Some(b'\n' | b'\r')) {
        bytes.pop();
    }
    bytes
}

// ---------------------------------------------------------------------------
// LineBuffer
// ---------------------------------------------------------------------------

/// The lines of one file, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineBuffer {
    lines: Vec<Line>,
}

impl LineBuffer {
    /// An empty buffer with no file behind it.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Load every line of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Open`] if the file cannot be opened and
    /// [`Error::Read`] if reading it fails part-way.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let buffer = Self::load_from(BufReader::new(file)).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;

        info!(path = %path.display(), lines = buffer.len(), "file loaded");
        Ok(buffer)
    }

    /// Read lines from any buffered reader until end of input.
    ///
    /// A final line without a terminator still counts as a line; an empty
    /// input yields an empty buffer.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from the reader.
    pub fn load_from(mut reader: impl BufRead) -> io::Result<Self> {
        let mut buffer = Self::new();
        loop {
            let mut line = Vec::new();
            if reader.read_until(b'\n', &mut line)? == 0 {
                break;
            }
            buffer.append_line(line);
        }
        Ok(buffer)
    }

    /// Append one line at the end, stripping trailing `\n` / `\r`.
    pub fn append_line(&mut self, content: impl Into<Vec<u8>>) {
        self.lines.push(Line {
            bytes: strip_terminators(content.into()),
        });
    }

    /// Number of lines.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the buffer has no lines at all.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The line at `row`, or `None` past the end.
    #[inline]
    #[must_use]
    pub fn line(&self, row: usize) -> Option<&Line> {
        self.lines.get(row)
    }

    /// Length of the line at `row`; 0 for the virtual line past the end.
    #[inline]
    #[must_use]
    pub fn line_len(&self, row: usize) -> usize {
        self.line(row).map_or(0, Line::len)
    }

    /// Iterate over all lines in order.
    pub fn iter(&self) -> impl Iterator<Item = &Line> {
        self.lines.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
