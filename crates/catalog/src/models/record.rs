use std::fmt::{Display, Formatter, Result as FmtResult};

/// Primary key of a catalog record.
///
/// Only ever compared and handed back to the store, never interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(pub i64);

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}
impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// The fields of a catalog record that are subject to cleaning.
///
/// Everything else in the row is left alone and only ever read back as part
/// of a [`Table`](crate::Table) for export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub id: RecordId,
    /// `None` when the column is NULL.
    pub title: Option<String>,
    /// `None` when the column is NULL.
    pub author: Option<String>,
}
impl Record {
    pub fn new(id: impl Into<RecordId>, title: Option<impl Into<String>>, author: Option<impl Into<String>>) -> Self {
        Self { id: id.into(), title: title.map(Into::into), author: author.map(Into::into) }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct RecordRow {
    id: i64,
    title: Option<String>,
    author: Option<String>,
}
impl From<RecordRow> for Record {
    fn from(row: RecordRow) -> Self {
        Self { id: RecordId(row.id), title: row.title, author: row.author }
    }
}
