//! SQLite catalog access for scrub.
//!
//! The catalog is the user's own database, holding one row per book. This
//! crate reads it, copies it aside, and writes cleaned titles and authors back
//! into it:
//!
//! - [`Database`] opens the store without modifying it.
//! - [`Repository`] lists records, dumps the whole table for export, and
//!   applies [`Change`]s in bounded batches inside a single transaction.
//! - [`snapshot`] makes a timestamped byte-for-byte copy of the store file,
//!   which is the only way back once changes are committed.

mod db;
pub mod error;
mod models;
mod repo;
mod snapshot;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use crate::db::Database;
pub use crate::models::{Cell, Change, Record, RecordId, Table};
pub use crate::repo::{MAX_BATCH_SIZE, Repository};
pub use crate::snapshot::{snapshot, snapshot_path};
