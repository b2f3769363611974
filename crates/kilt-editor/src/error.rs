//! Editor-layer errors.
//!
//! Every variant is fatal at startup: the binary restores the terminal,
//! clears the screen, prints the message and exits with status 1.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures while loading a file or setting up the session.
#[derive(Debug, Error)]
pub enum Error {
    /// The file could not be opened.
    #[error("cannot open {}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file opened but reading it failed part-way.
    #[error("cannot read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The terminal layer failed.
    #[error(transparent)]
    Term(#[from] kilt_term::Error),
}

/// Shorthand used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
