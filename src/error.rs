//! Run Error Types
//!
//! Each kind maps to its own process exit code so scripts can tell a missing
//! store apart from a rolled-back run.

use derive_more::{Display, Error};

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    #[display("catalog store not found")]
    StoreNotFound,
    #[display("applying changes failed; the transaction was rolled back and the store is unchanged")]
    Transaction,
    #[display("could not snapshot the store; nothing was changed")]
    Snapshot,
    #[display("could not read the catalog")]
    Database,
    #[display("invalid configuration")]
    Config,
    #[display("could not write the report")]
    Output,
}

impl ErrorKind {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::StoreNotFound => 1,
            Self::Transaction => 2,
            Self::Snapshot => 3,
            Self::Database => 4,
            Self::Config => 5,
            Self::Output => 6,
        }
    }
}
