//! Catalog Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A catalog error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The store file does not exist (or isn't a file).
    #[display("store not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    #[display("database error")]
    Database,
    /// The table is missing, or lacks one of the `id`, `title`, `author` columns.
    #[display("table {_0:?} is missing or does not have id, title and author columns")]
    InvalidTable(#[error(not(source))] String),
    /// A value read from the store could not be converted.
    #[display("invalid store data: {_0}")]
    InvalidData(#[error(not(source))] &'static str),
    /// Copying the store aside failed. Nothing has been written to the store.
    #[display("could not create snapshot: {}", _0.display())]
    Snapshot(#[error(not(source))] PathBuf),
    /// A batch of updates failed and the whole transaction was rolled back.
    /// `index` is zero-based.
    #[display("update batch {index} ({size} changes) failed; all changes rolled back")]
    Batch { index: usize, size: usize },
    /// Every batch was issued but the final commit failed.
    #[display("commit failed; all changes rolled back")]
    Commit,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // A locked database or a full disk can clear up; the store being
        // absent or malformed won't.
        matches!(self, Self::Database | Self::Snapshot(_) | Self::Batch { .. } | Self::Commit)
    }
}
