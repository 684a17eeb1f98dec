//! Reads and writes against the catalog table.
//!
//! The table name is configurable, so statements are assembled at runtime
//! around a quoted identifier instead of living in static SQL files.

use crate::Database;
use crate::error::{ErrorKind, Result};
use crate::models::{Cell, Change, Record, RecordRow, Table};
use exn::ResultExt;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use std::num::NonZeroUsize;
use tracing::instrument;

/// Columns the cleaner reads and writes. Any others are carried along untouched.
const REQUIRED_COLUMNS: [&str; 3] = ["id", "title", "author"];

/// Each change binds three parameters. SQLite (since 3.32) allows 32766 bound
/// parameters per statement.
pub const MAX_BATCH_SIZE: usize = 32766 / 3;

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Access to one catalog table.
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
    name: String,
    /// Quoted form of `name`, ready to splice into SQL.
    table: String,
}
impl Repository {
    /// Bind to `table`, checking that it exists and has the `id`, `title`
    /// and `author` columns.
    #[instrument(skip(db))]
    pub async fn open(db: &Database, table: &str) -> Result<Self> {
        if table.is_empty() || table.contains('\0') {
            exn::bail!(ErrorKind::InvalidTable(table.to_string()));
        }
        let repo = Self { pool: db.pool().clone(), name: table.to_string(), table: quote_identifier(table) };
        let columns = repo.columns().await?;
        if !REQUIRED_COLUMNS.iter().all(|required| columns.iter().any(|c| c.eq_ignore_ascii_case(required))) {
            exn::bail!(ErrorKind::InvalidTable(table.to_string()));
        }
        Ok(repo)
    }

    /// Unquoted table name.
    pub fn table(&self) -> &str {
        &self.name
    }

    // =========================================================================
    // Read
    // =========================================================================

    /// Column names in schema order. Empty if the table doesn't exist.
    pub async fn columns(&self) -> Result<Vec<String>> {
        sqlx::query_scalar("SELECT name FROM pragma_table_info(?1) ORDER BY cid")
            .bind(&self.name)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)
    }

    /// Every record's id, title and author, in the table's natural order.
    ///
    /// Non-text titles or authors (a bare number, say) are read as their text
    /// form.
    #[instrument(skip(self), fields(table = %self.name))]
    pub async fn list_records(&self) -> Result<Vec<Record>> {
        let sql = format!("SELECT COUNT(*) FROM {} WHERE typeof(id) <> 'integer'", self.table);
        let non_integer: i64 =
            sqlx::query_scalar(&sql).fetch_one(&self.pool).await.or_raise(|| ErrorKind::Database)?;
        if non_integer > 0 {
            tracing::error!(rows = non_integer, "Record ids must be integers");
            exn::bail!(ErrorKind::InvalidData("id"));
        }
        let sql = format!(
            "SELECT id, CAST(title AS TEXT) AS title, CAST(author AS TEXT) AS author FROM {}",
            self.table
        );
        let rows: Vec<RecordRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await.or_raise(|| ErrorKind::Database)?;
        tracing::debug!(records = rows.len(), "Loaded catalog records");
        Ok(rows.into_iter().map(Record::from).collect())
    }

    /// The whole table, every column, as currently stored.
    #[instrument(skip(self), fields(table = %self.name))]
    pub async fn dump(&self) -> Result<Table> {
        let columns = self.columns().await?;
        if columns.is_empty() {
            exn::bail!(ErrorKind::InvalidTable(self.name.clone()));
        }
        let select = columns.iter().map(|c| quote_identifier(c)).collect::<Vec<_>>().join(", ");
        let sql = format!("SELECT {select} FROM {}", self.table);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await.or_raise(|| ErrorKind::Database)?;
        let rows = rows
            .iter()
            .map(|row| {
                (0..columns.len())
                    .map(|index| Cell::decode(row, index).or_raise(|| ErrorKind::InvalidData("column value")))
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Table { columns, rows })
    }

    // =========================================================================
    // Update
    // =========================================================================

    /// Apply every change, `batch_size` rows per statement, as one transaction.
    ///
    /// Either all changes are committed or none are: the first failing batch
    /// rolls the whole transaction back and is reported as
    /// [`ErrorKind::Batch`] with its (zero-based) index. Returns the number of
    /// rows updated.
    #[instrument(skip(self, changes), fields(table = %self.name, changes = changes.len()))]
    pub async fn apply(&self, changes: &[Change], batch_size: NonZeroUsize) -> Result<u64> {
        if changes.is_empty() {
            return Ok(0);
        }
        let batch_size = batch_size.get().min(MAX_BATCH_SIZE);
        let mut tx = self.pool.begin().await.or_raise(|| ErrorKind::Database)?;
        let mut updated = 0;
        for (index, batch) in changes.chunks(batch_size).enumerate() {
            match self.apply_batch(&mut tx, batch).await {
                Ok(rows) => {
                    tracing::debug!(batch = index, size = batch.len(), rows, "Batch applied");
                    if rows < batch.len() as u64 {
                        tracing::warn!(batch = index, size = batch.len(), rows, "Some records in batch no longer exist");
                    }
                    updated += rows;
                },
                Err(e) => {
                    if let Err(rollback) = tx.rollback().await {
                        tracing::error!(error = %rollback, "Rollback failed; SQLite will discard the transaction on close");
                    }
                    tracing::error!(batch = index, size = batch.len(), error = %e, "Batch failed; transaction rolled back");
                    return Err(e).or_raise(|| ErrorKind::Batch { index, size: batch.len() });
                },
            }
        }
        tx.commit().await.or_raise(|| ErrorKind::Commit)?;
        tracing::info!(updated, "Transaction committed");
        Ok(updated)
    }

    /// `UPDATE <table> SET ... FROM (VALUES (id, title, author), ...)` for one batch.
    async fn apply_batch(&self, conn: &mut SqliteConnection, batch: &[Change]) -> sqlx::Result<u64> {
        let mut builder = QueryBuilder::<Sqlite>::new(format!(
            "UPDATE {table} SET title = changes.column2, author = changes.column3 FROM (",
            table = self.table
        ));
        builder.push_values(batch, |mut row, change| {
            row.push_bind(change.id.0).push_bind(change.title.clone()).push_bind(change.author.clone());
        });
        builder.push(format!(") AS changes WHERE {}.id = changes.column1", self.table));
        let result = builder.build().execute(conn).await?;
        Ok(result.rows_affected())
    }
}
