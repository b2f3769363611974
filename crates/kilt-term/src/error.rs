// SPDX-License-Identifier: MIT
//
// Terminal-layer errors.
//
// Every variant here is fatal for the session: the caller restores the
// terminal, clears the screen, prints the diagnostic and exits non-zero.
// Read timeouts are not errors and never reach this type.

use std::io;

use thiserror::Error;

/// Failures while configuring or talking to the terminal device.
#[derive(Debug, Error)]
pub enum Error {
    /// `tcgetattr` failed (stdin is not a terminal, or the device vanished).
    #[error("tcgetattr failed")]
    GetAttr(#[source] io::Error),

    /// `tcsetattr` failed while entering or leaving raw mode.
    #[error("tcsetattr failed")]
    SetAttr(#[source] io::Error),

    /// Neither the ioctl query nor the cursor-report fallback produced a size.
    #[error("unable to determine window size")]
    WindowSize,

    /// A device read failed for a reason other than a timeout.
    #[error("reading from the terminal failed")]
    Read(#[source] io::Error),

    /// Writing to the device failed during setup.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Shorthand used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
