//! Error types

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to parse a size string such as `50K` or `0x20M`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SizeParseError {
    #[error("size is empty")]
    Empty,

    #[error("size must not be negative")]
    Negative,

    #[error("invalid number: {0}")]
    InvalidNumber(String),

    #[error("{0} is not a whole number of bytes")]
    FractionalBytes(String),

    #[error("{0} is too large")]
    Overflow(String),
}

/// Unrecoverable scan failure.
///
/// Unlike an unreadable directory, which is recorded as a
/// [`SkippedEntry`](crate::tree::SkippedEntry) and does not stop the scan,
/// these abort the whole measurement.
#[derive(Error, Debug)]
pub enum MeasureError {
    #[error("failed to release directory handle for {}: {source}", path.display())]
    HandleClose {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type MeasureResult<T> = Result<T, MeasureError>;
