use serde::{Serialize, Serializer};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, TypeInfo, ValueRef};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// A single value, in whichever SQLite storage class it was stored as.
#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}
impl Cell {
    /// Read column `index` of `row`, keeping its storage class rather than
    /// the column's declared type.
    pub(crate) fn decode(row: &SqliteRow, index: usize) -> sqlx::Result<Self> {
        let raw = row.try_get_raw(index)?;
        if raw.is_null() {
            return Ok(Self::Null);
        }
        match raw.type_info().name() {
            "INTEGER" => Ok(Self::Integer(row.try_get_unchecked(index)?)),
            "REAL" => Ok(Self::Real(row.try_get_unchecked(index)?)),
            "BLOB" => Ok(Self::Blob(row.try_get_unchecked(index)?)),
            _ => Ok(Self::Text(row.try_get_unchecked(index)?)),
        }
    }

    fn hex(bytes: &[u8]) -> String {
        bytes.iter().map(|byte| format!("{byte:02x}")).collect()
    }
}

impl Display for Cell {
    /// Flat text form, as used for CSV. NULL is an empty string, BLOBs are
    /// lowercase hex.
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Null => Ok(()),
            Self::Integer(value) => write!(f, "{value}"),
            // Debug keeps the trailing `.0` on whole numbers.
            Self::Real(value) => write!(f, "{value:?}"),
            Self::Text(value) => f.write_str(value),
            Self::Blob(value) => f.write_str(&Self::hex(value)),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Integer(value) => serializer.serialize_i64(*value),
            Self::Real(value) => serializer.serialize_f64(*value),
            Self::Text(value) => serializer.serialize_str(value),
            Self::Blob(value) => serializer.serialize_str(&Self::hex(value)),
        }
    }
}

/// Every column of every row of the catalog table, in schema and scan order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}
impl Table {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
