//! Store fixtures shared with other crates' tests (`testing` feature).

use crate::Database;
use std::path::Path;

/// A catalog table with one extra column the cleaner doesn't touch.
pub const BOOKS_SCHEMA: &str = "CREATE TABLE books (id INTEGER PRIMARY KEY, title TEXT, author TEXT, genre TEXT)";

/// Create a new store file at `path`.
pub async fn create(path: impl AsRef<Path>) -> Database {
    let path = path.as_ref();
    let options = Database::base_options().filename(path).create_if_missing(true);
    Database::new(options, Some(path.to_path_buf())).await.unwrap()
}

/// Run `schema`, then insert `(id, title, author)` rows into `books`.
pub async fn seed(db: &Database, schema: &str, rows: &[(i64, Option<&str>, Option<&str>)]) {
    sqlx::query(schema).execute(db.pool()).await.unwrap();
    for (id, title, author) in rows {
        sqlx::query("INSERT INTO books (id, title, author) VALUES (?1, ?2, ?3)")
            .bind(id)
            .bind(title)
            .bind(author)
            .execute(db.pool())
            .await
            .unwrap();
    }
}

/// Make any update that sets `title` to `sentinel` abort.
pub async fn fail_on_title(db: &Database, table: &str, sentinel: &str) {
    let sql = format!(
        "CREATE TRIGGER fail_on_sentinel BEFORE UPDATE ON \"{table}\" WHEN NEW.title = '{sentinel}' \
         BEGIN SELECT RAISE(ABORT, 'sentinel title'); END"
    );
    sqlx::query(&sql).execute(db.pool()).await.unwrap();
}
