//! Error types for row store operations

use rowstore_core::CoreError;
use thiserror::Error;

/// Errors surfaced by row stores, views, key indexes and persistence
#[derive(Debug, Error)]
pub enum Error {
    /// Layout or encoding violation detected by the core validators
    #[error("format error: {0}")]
    Format(#[from] CoreError),
    /// Underlying reader or writer failed
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// Row number past the last sealed row
    #[error("row {row} out of range for {rows} rows")]
    RowOutOfRange { row: usize, rows: usize },
    /// Copy between spans of different lengths
    #[error("span length mismatch: expected {expected}, found {found}")]
    SizeMismatch { expected: usize, found: usize },
    /// Element reference does not point into the span
    #[error("element does not lie within the span")]
    NotInSpan,
    /// Serialized revision is not the one this build reads
    #[error("unsupported revision {found}, expected {expected}")]
    RevisionMismatch { found: u8, expected: u8 },
    /// Bucket-sort source names a target outside `0..size`
    #[error("target index {index} outside 0..{size}")]
    TargetOutOfRange { index: i32, size: usize },
    /// Keyed store has a different number of rows and keys
    #[error("{rows} rows but {keys} keys")]
    KeyCountMismatch { rows: usize, keys: usize },
    /// Textual key is not valid UTF-8
    #[error("invalid textual key")]
    InvalidKey,
}

/// Result type for row store operations
pub type Result<T> = std::result::Result<T, Error>;
