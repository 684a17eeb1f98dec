//! Normalizer Error Types
//!
//! Normalization itself is total and never fails; the only fallible surface
//! is parsing a [`Mode`](crate::Mode) from user input.

use derive_more::{Display, Error};

/// A normalizer error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for normalizer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The requested cleaning mode does not exist.
    #[display("unknown cleaning mode: {_0}")]
    UnknownMode(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::UnknownMode("loud".to_string()).to_string(), "unknown cleaning mode: loud");
        assert!(!ErrorKind::UnknownMode(String::new()).is_retryable());
    }
}
