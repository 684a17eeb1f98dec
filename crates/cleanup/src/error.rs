//! Cleanup Error Types
//!
//! Only exports can fail here; detection and reporting work on data that is
//! already in memory.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A cleanup error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for cleanup operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies which export failed.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("CSV export to {} failed", _0.display())]
    Csv(#[error(not(source))] PathBuf),
    #[display("JSON export to {} failed", _0.display())]
    Json(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Usually a missing directory or permissions; retrying as-is won't help.
        false
    }
}
