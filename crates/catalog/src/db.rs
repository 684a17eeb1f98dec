//! Database connection management.

use exn::ResultExt;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::{Path, PathBuf};
use tracing::instrument;

use crate::error::{ErrorKind, Result};

/// Handle to the catalog store.
///
/// The store belongs to the user, so connecting never changes it: no
/// migrations, no journal mode switch, no `PRAGMA optimize` on close. The
/// pool holds a single connection; every read and the update transaction go
/// through it one after the other.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    path: Option<PathBuf>,
}

impl Database {
    pub(crate) async fn new(options: SqliteConnectOptions, path: Option<PathBuf>) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            // One writer, one connection. This also keeps in-memory databases
            // from turning into several unrelated databases.
            .max_connections(1)
            .connect_with(options)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(Self { pool, path })
    }

    /// Open an existing store.
    ///
    /// Returns [`ErrorKind::NotFound`] without touching the filesystem further
    /// if `path` isn't an existing file; SQLite would otherwise happily create
    /// an empty database in its place.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            exn::bail!(ErrorKind::NotFound(path.to_path_buf()));
        }
        let options = Self::base_options().filename(path).create_if_missing(false);
        Self::new(options, Some(path.to_path_buf())).await
    }

    /// Connect to an in-memory database (useful for testing).
    ///
    /// Note:
    /// - In-memory databases are destroyed when the connection closes.
    /// - Do NOT apply `#[cfg(test)]` so that other crates can also use this in their tests.
    pub async fn connect_in_memory() -> Result<Self> {
        let options = Self::base_options().filename(":memory:");
        Self::new(options, None).await
    }

    /// Base connection options shared between file and in-memory databases.
    pub(crate) fn base_options() -> SqliteConnectOptions {
        SqliteConnectOptions::new()
            // PRAGMA busy_timeout = 1500ms
            // Another program (an e-reader library manager, usually) may have
            // the file open; give it a moment before failing.
            .busy_timeout(std::time::Duration::from_millis(1500))
    }

    /// Fold any write-ahead log back into the main database file.
    ///
    /// A file-level copy of a WAL-mode store taken without this can miss
    /// committed data. For rollback-journal stores this is a no-op.
    #[instrument(skip(self))]
    pub async fn checkpoint(&self) -> Result<()> {
        let (busy, log, checkpointed): (i64, i64, i64) = sqlx::query_as("PRAGMA wal_checkpoint(TRUNCATE)")
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        tracing::debug!(busy, log, checkpointed, "WAL checkpoint finished");
        if busy != 0 {
            exn::bail!(ErrorKind::Database);
        }
        Ok(())
    }

    /// Get a reference to the underlying connection pool.
    ///
    /// This is useful for running custom queries or transactions.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Location of the store on disk, `None` for in-memory databases.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Close the connection pool, waiting for the connection to be returned.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
