//! Error types for folio.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for folio operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while driving a document.
///
/// Only failures the host must handle explicitly are errors. A page that
/// fails to render, a text pass that aborts, a link without a target or a
/// source query without a match all degrade to empty results instead.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The engine could not open the document.
    #[error("Failed to open {}: {reason}", path.display())]
    Open {
        /// Path that was being opened
        path: PathBuf,
        /// Engine-provided reason
        reason: String,
    },

    /// An operation was attempted while no document is open.
    #[error("No document is open")]
    NotOpen,

    /// An operation was attempted before the document was unlocked.
    #[error("Document is locked and requires a password")]
    Locked,

    /// Page index is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(usize, usize),

    /// A render was requested with an empty pixel box.
    #[error("Invalid render size {width}x{height}")]
    InvalidSize {
        /// Requested width in pixels
        width: u32,
        /// Requested height in pixels
        height: u32,
    },

    /// The engine failed an operation that has no degraded result.
    #[error("Engine error: {0}")]
    Engine(String),

    /// The document worker has shut down.
    #[error("Document worker is no longer running")]
    WorkerClosed,

    /// A thread panicked while holding the document lock.
    #[error("Document lock poisoned")]
    LockPoisoned,

    /// Error serializing model types.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for Error {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        Error::LockPoisoned
    }
}
