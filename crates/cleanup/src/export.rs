//! Whole-table export to CSV and JSON.
//!
//! Both formats carry every column of the catalog table, not just the ones
//! that were cleaned. Each export stands alone: callers run them separately so
//! one failing doesn't stop the other.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use scrub_catalog::{Cell, Table};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::instrument;

/// One row as a JSON object, keys in column order.
struct RowObject<'a> {
    columns: &'a [String],
    cells: &'a [Cell],
}
impl Serialize for RowObject<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, cell) in self.columns.iter().zip(self.cells) {
            map.serialize_entry(column, cell)?;
        }
        map.end()
    }
}

/// The table as a JSON array of row objects.
struct Rows<'a>(&'a Table);
impl Serialize for Rows<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.rows.len()))?;
        for cells in &self.0.rows {
            seq.serialize_element(&RowObject { columns: &self.0.columns, cells })?;
        }
        seq.end()
    }
}

/// Header row of column names, then one record per row. NULL is written as an
/// empty field.
pub fn write_csv<W: Write>(table: &Table, writer: W) -> std::result::Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(ToString::to_string))?;
    }
    writer.flush()?;
    Ok(())
}

/// Pretty-printed array of objects. Non-ASCII text is written as-is, not
/// `\u`-escaped.
pub fn write_json<W: Write>(table: &Table, writer: W) -> serde_json::Result<()> {
    let mut writer = BufWriter::new(writer);
    serde_json::to_writer_pretty(&mut writer, &Rows(table))?;
    writer.write_all(b"\n").map_err(serde_json::Error::io)?;
    writer.flush().map_err(serde_json::Error::io)
}

/// Write `table` as CSV to `path`, replacing any existing file.
#[instrument(skip(table), fields(path = %path.display(), rows = table.len()))]
pub fn export_csv(table: &Table, path: &Path) -> Result<()> {
    let file = File::create(path).or_raise(|| ErrorKind::Csv(path.to_path_buf()))?;
    write_csv(table, file).or_raise(|| ErrorKind::Csv(path.to_path_buf()))?;
    tracing::info!("CSV export written");
    Ok(())
}

/// Write `table` as JSON to `path`, replacing any existing file.
#[instrument(skip(table), fields(path = %path.display(), rows = table.len()))]
pub fn export_json(table: &Table, path: &Path) -> Result<()> {
    let file = File::create(path).or_raise(|| ErrorKind::Json(path.to_path_buf()))?;
    write_json(table, file).or_raise(|| ErrorKind::Json(path.to_path_buf()))?;
    tracing::info!("JSON export written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn table() -> Table {
        Table {
            columns: vec!["id".into(), "title".into(), "author".into(), "rating".into(), "cover".into()],
            rows: vec![
                vec![
                    Cell::Integer(1),
                    Cell::Text("Kürk Mantolu Madonna".into()),
                    Cell::Text("Sabahattin Ali".into()),
                    Cell::Real(4.5),
                    Cell::Null,
                ],
                vec![
                    Cell::Integer(2),
                    Cell::Text("Title, with \"quotes\"".into()),
                    Cell::Null,
                    Cell::Null,
                    Cell::Blob(vec![0xbe, 0xef]),
                ],
            ],
        }
    }

    #[test]
    fn test_csv() {
        let mut out = Vec::new();
        write_csv(&table(), &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "id,title,author,rating,cover\n\
             1,Kürk Mantolu Madonna,Sabahattin Ali,4.5,\n\
             2,\"Title, with \"\"quotes\"\"\",,,beef\n"
        );
    }

    #[test]
    fn test_csv_empty_table_still_has_header() {
        let table = Table { columns: vec!["id".into(), "title".into()], rows: vec![] };
        let mut out = Vec::new();
        write_csv(&table, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "id,title\n");
    }

    #[test]
    fn test_json() {
        let mut out = Vec::new();
        write_json(&table(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Kürk Mantolu Madonna"), "non-ASCII must not be escaped");
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            value,
            serde_json::json!([
                {"id": 1, "title": "Kürk Mantolu Madonna", "author": "Sabahattin Ali", "rating": 4.5, "cover": null},
                {"id": 2, "title": "Title, with \"quotes\"", "author": null, "rating": null, "cover": "beef"},
            ])
        );
    }

    #[test]
    fn test_json_keeps_column_order() {
        let mut out = Vec::new();
        write_json(&table(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let positions: Vec<usize> =
            ["\"id\"", "\"title\"", "\"author\"", "\"rating\"", "\"cover\""].iter().map(|k| text.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_export_to_files() {
        let dir = TempDir::new().unwrap();
        let csv = dir.path().join("books.csv");
        let json = dir.path().join("books.json");
        export_csv(&table(), &csv).unwrap();
        export_json(&table(), &json).unwrap();
        assert!(std::fs::read_to_string(csv).unwrap().starts_with("id,title,author,rating,cover\n"));
        assert!(std::fs::read_to_string(json).unwrap().starts_with("[\n"));
    }

    #[test]
    fn test_export_failures_name_the_format() {
        let dir = TempDir::new().unwrap();
        let nowhere = dir.path().join("missing-dir").join("out");
        let err = export_csv(&table(), &nowhere).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Csv(p) if *p == nowhere));
        let err = export_json(&table(), &nowhere).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Json(p) if *p == nowhere));
    }
}
