// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// The byte-read primitive the key decoder pulls from.
//
// In raw mode kilt configures the terminal with VMIN=0, VTIME=1: a read
// returns as soon as one byte is available, or returns zero bytes after
// 100ms of silence. That bounded wait is what lets the decoder tell a lone
// Escape keypress apart from the first byte of an escape sequence without
// a second thread or `poll()`.
//
// `ByteSource` abstracts the primitive so the decoder, the window-size
// fallback and the session loop run unchanged over a byte slice in tests.

use std::io;

/// A source of single input bytes with a bounded wait.
pub trait ByteSource {
    /// Read one byte.
    ///
    /// Returns `Ok(Some(byte))` when a byte arrived, `Ok(None)` when the
    /// bounded wait elapsed with nothing to read.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying device read fails.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        (**self).read_byte()
    }
}

/// A slice behaves like a terminal that has already typed its bytes: each
/// read pops one, and an exhausted slice times out forever.
impl ByteSource for &[u8] {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let Some((&first, rest)) = self.split_first() else {
            return Ok(None);
        };
        *self = rest;
        Ok(Some(first))
    }
}

// ─── Stdin ───────────────────────────────────────────────────────────────────

/// Reads the controlling terminal through fd 0, one byte per call.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinSource;

impl StdinSource {
    /// Create a stdin source.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[cfg(unix)]
impl ByteSource for StdinSource {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = 0u8;
        let n = unsafe { libc::read(libc::STDIN_FILENO, (&raw mut byte).cast(), 1) };

        match n {
            1 => Ok(Some(byte)),
            0 => Ok(None),
            _ => {
                let err = io::Error::last_os_error();
                // Some platforms report the VTIME expiry as EAGAIN instead of
                // a zero-length read; a signal can also interrupt the wait.
                match err.kind() {
                    io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted => Ok(None),
                    _ => Err(err),
                }
            }
        }
    }
}

#[cfg(not(unix))]
impl ByteSource for StdinSource {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        use std::io::Read;

        let mut byte = [0u8; 1];
        match io::stdin().lock().read(&mut byte) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(byte[0])),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(None),
            Err(e) => Err(e),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_pops_in_order() {
        let mut src: &[u8] = b"ab";
        assert_eq!(src.read_byte().unwrap(), Some(b'a'));
        assert_eq!(src.read_byte().unwrap(), Some(b'b'));
    }

    #[test]
    fn exhausted_slice_times_out() {
        let mut src: &[u8] = b"";
        assert_eq!(src.read_byte().unwrap(), None);
        assert_eq!(src.read_byte().unwrap(), None);
    }

    #[test]
    fn slice_leaves_unread_bytes() {
        let mut src: &[u8] = b"xyz";
        src.read_byte().unwrap();
        assert_eq!(src, b"yz");
    }

    #[test]
    fn mutable_reference_forwards() {
        let mut src: &[u8] = b"q";
        let by_ref = &mut src;
        assert_eq!(by_ref.read_byte().unwrap(), Some(b'q'));
        assert!(src.is_empty());
    }
}
