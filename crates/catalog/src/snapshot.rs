//! Point-in-time copies of the store, taken before anything is written to it.

use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use std::path::{Path, PathBuf};
use time::UtcDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use tokio::fs::{File, OpenOptions};
use tracing::instrument;

/// Sortable, second precision: `YYYYMMDDHHMMSS`.
const TIMESTAMP: &[BorrowedFormatItem<'static>] = format_description!("[year][month][day][hour][minute][second]");

/// Where a snapshot of `store` taken at `at` goes:
/// `<dir>/<stem>_backup_<YYYYMMDDHHMMSS>[.<ext>]`.
pub fn snapshot_path(store: impl AsRef<Path>, at: UtcDateTime) -> Result<PathBuf> {
    let store = store.as_ref();
    let stem = store.file_stem().ok_or_raise(|| ErrorKind::Snapshot(store.to_path_buf()))?;
    let stamp = at.format(TIMESTAMP).or_raise(|| ErrorKind::Snapshot(store.to_path_buf()))?;
    let mut name = stem.to_os_string();
    name.push("_backup_");
    name.push(stamp);
    if let Some(extension) = store.extension() {
        name.push(".");
        name.push(extension);
    }
    Ok(store.with_file_name(name))
}

/// Copy `store` byte-for-byte next to itself, named by [`snapshot_path`]
/// with the current UTC time, and return the copy's path.
///
/// An existing file is never overwritten: two snapshots within the same
/// second fail with [`ErrorKind::Snapshot`] instead. The copy is flushed to
/// disk before returning.
///
/// Callers holding a connection should [`checkpoint`](crate::Database::checkpoint)
/// first so that a WAL-mode store's main file is complete.
#[instrument(skip_all, fields(store = %store.as_ref().display()))]
pub async fn snapshot(store: impl AsRef<Path>) -> Result<PathBuf> {
    let store = store.as_ref();
    let target = snapshot_path(store, UtcDateTime::now())?;
    let failed = || ErrorKind::Snapshot(target.clone());
    let mut source = File::open(store).await.or_raise(failed)?;
    let mut copy = OpenOptions::new().write(true).create_new(true).open(&target).await.or_raise(failed)?;
    let bytes = tokio::io::copy(&mut source, &mut copy).await.or_raise(failed)?;
    copy.sync_all().await.or_raise(failed)?;
    tracing::info!(snapshot = %target.display(), bytes, "Snapshot created");
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;
    use crate::testing::{BOOKS_SCHEMA, create, seed};
    use rstest::rstest;
    use tempfile::TempDir;
    use time::{Date, Month, Time};

    fn at() -> UtcDateTime {
        UtcDateTime::new(
            Date::from_calendar_date(2024, Month::March, 5).unwrap(),
            Time::from_hms(7, 8, 9).unwrap(),
        )
    }

    #[rstest]
    #[case("./library.db", "./library_backup_20240305070809.db")]
    #[case("/srv/books/catalog.sqlite3", "/srv/books/catalog_backup_20240305070809.sqlite3")]
    #[case("library", "library_backup_20240305070809")]
    #[case("my.library.db", "my.library_backup_20240305070809.db")]
    fn test_snapshot_path(#[case] store: &str, #[case] expected: &str) {
        assert_eq!(snapshot_path(store, at()).unwrap(), PathBuf::from(expected));
    }

    #[test]
    fn test_snapshot_names_sort_chronologically() {
        let earlier = snapshot_path("library.db", at()).unwrap();
        let later = snapshot_path("library.db", at() + time::Duration::seconds(61)).unwrap();
        assert!(earlier < later);
    }

    #[test]
    fn test_snapshot_path_needs_a_file_name() {
        let err = snapshot_path("/", at()).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Snapshot(_)));
    }

    #[tokio::test]
    async fn test_snapshot_is_byte_identical() {
        let dir = TempDir::new().unwrap();
        let store = dir.path().join("library.db");
        let db = create(&store).await;
        seed(&db, BOOKS_SCHEMA, &[(1, Some("Dune (1965)"), Some("Frank Herbert"))]).await;
        db.checkpoint().await.unwrap();
        let before = std::fs::read(&store).unwrap();

        let copy = snapshot(&store).await.unwrap();
        assert_eq!(copy.parent(), Some(dir.path()));
        assert!(copy.file_name().unwrap().to_str().unwrap().starts_with("library_backup_"));
        assert_eq!(std::fs::read(&copy).unwrap(), before);

        // The copy is a working store in its own right.
        let restored = Database::open(&copy).await.unwrap();
        let title: String = sqlx::query_scalar("SELECT title FROM books").fetch_one(restored.pool()).await.unwrap();
        assert_eq!(title, "Dune (1965)");
        restored.close().await;
        db.close().await;
    }

    #[tokio::test]
    async fn test_snapshot_of_missing_store_fails() {
        let dir = TempDir::new().unwrap();
        let err = snapshot(dir.path().join("missing.db")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Snapshot(_)));
    }

    #[tokio::test]
    async fn test_snapshot_never_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = dir.path().join("library.db");
        std::fs::write(&store, b"not really sqlite").unwrap();
        // Occupy the next few seconds' names so the copy can't land anywhere.
        let now = UtcDateTime::now();
        for offset in 0..5 {
            let taken = snapshot_path(&store, now + time::Duration::seconds(offset)).unwrap();
            std::fs::write(&taken, b"earlier snapshot").unwrap();
        }
        let err = snapshot(&store).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Snapshot(_)));
        let kept = snapshot_path(&store, now).unwrap();
        assert_eq!(std::fs::read(kept).unwrap(), b"earlier snapshot");
    }
}
