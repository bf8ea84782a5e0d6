//! Error types for the store layer.

use std::path::PathBuf;

/// Errors raised by a `KvStore`.
///
/// These are persistence failures only. Payload parsing belongs to the
/// adapter layer; a store never looks inside a payload.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Reading or writing the backing file failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file exists but does not hold a string-to-string map.
    #[error("store file {} is corrupt: {message}", .path.display())]
    Corrupt { path: PathBuf, message: String },

    /// A thread panicked while holding the store lock.
    #[error("store lock poisoned")]
    Poisoned,

    #[error("An implementation error occurred: {message}")]
    ImplementationFailure { message: String },
}
