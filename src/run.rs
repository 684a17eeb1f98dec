//! A single cleaning run, from opening the store to writing exports.
//!
//! The order matters: nothing is written to the store until a snapshot of it
//! exists, and the transaction is closed before any export starts. Exports
//! are best-effort; a failed one is reported and the run carries on.

use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use scrub_catalog::error::ErrorKind as CatalogErrorKind;
use scrub_catalog::{Change, Database, Repository, Table};
use scrub_cleanup::{Analysis, analyze, export};
use scrub_config::Config;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Everything a run needs, after config and command-line have been merged.
#[derive(Clone, Debug)]
pub struct Settings {
    pub config: Config,
    /// Write changes to the store. Off means preview only.
    pub apply: bool,
    pub export_csv: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct Outcome {
    pub analysis: Analysis,
    pub snapshot: Option<PathBuf>,
    /// Rows the store reported as updated, when changes were applied.
    pub updated: Option<u64>,
    pub exported: Vec<PathBuf>,
    pub failed_exports: Vec<PathBuf>,
}

/// Run once against the configured store, writing the report to `out`.
///
/// Fails with [`ErrorKind::StoreNotFound`] before reading anything if the
/// store is missing, with [`ErrorKind::Snapshot`] before writing anything if
/// the store can't be copied, and with [`ErrorKind::Transaction`] (store left
/// untouched) if applying the changes fails.
#[instrument(skip_all, fields(store = %settings.config.store.display(), apply = settings.apply))]
pub async fn run<W: Write>(settings: &Settings, out: &mut W) -> Result<Outcome> {
    let db = match Database::open(&settings.config.store).await {
        Ok(db) => db,
        Err(e) if matches!(&*e, CatalogErrorKind::NotFound(_)) => {
            return Err(e).or_raise(|| ErrorKind::StoreNotFound);
        },
        Err(e) => return Err(e).or_raise(|| ErrorKind::Database),
    };
    let outcome = execute(settings, &db, out).await;
    db.close().await;
    outcome
}

async fn execute<W: Write>(settings: &Settings, db: &Database, out: &mut W) -> Result<Outcome> {
    let config = &settings.config;
    let repo = Repository::open(db, &config.table).await.or_raise(|| ErrorKind::Database)?;
    let records = repo.list_records().await.or_raise(|| ErrorKind::Database)?;
    let analysis = analyze(&records, config.mode, config.preview);
    write!(out, "{analysis}").or_raise(|| ErrorKind::Output)?;

    let mut outcome = Outcome { analysis, ..Outcome::default() };
    let exporting = settings.export_csv.is_some() || settings.export_json.is_some();
    if !outcome.analysis.has_changes() && !exporting {
        writeln!(out, "\nNothing to do: every title and author is already clean.").or_raise(|| ErrorKind::Output)?;
        return Ok(outcome);
    }

    if outcome.analysis.has_changes() {
        if settings.apply {
            let updated = apply(config, db, &repo, &outcome.analysis.changes, out, &mut outcome.snapshot).await?;
            outcome.updated = Some(updated);
        } else {
            writeln!(
                out,
                "\nPreview only: re-run with --apply to write {} changed records.",
                outcome.analysis.changes.len()
            )
            .or_raise(|| ErrorKind::Output)?;
        }
    }

    if exporting {
        export_all(settings, &repo, out, &mut outcome).await?;
    }
    Ok(outcome)
}

/// Snapshot, then commit every change in one transaction.
async fn apply<W: Write>(
    config: &Config,
    db: &Database,
    repo: &Repository,
    changes: &[Change],
    out: &mut W,
    snapshot: &mut Option<PathBuf>,
) -> Result<u64> {
    let batch_size = config.batch_size().or_raise(|| ErrorKind::Config)?;
    let store = db.path().ok_or_raise(|| ErrorKind::Snapshot)?;
    // Fold any WAL contents into the main file so the copy is complete.
    db.checkpoint().await.or_raise(|| ErrorKind::Snapshot)?;
    let path = scrub_catalog::snapshot(store).await.or_raise(|| ErrorKind::Snapshot)?;
    writeln!(out, "\nSnapshot saved to {}", path.display()).or_raise(|| ErrorKind::Output)?;
    *snapshot = Some(path);

    let updated = repo.apply(changes, batch_size).await.or_raise(|| ErrorKind::Transaction)?;
    tracing::info!(changes = changes.len(), updated, "Changes committed");
    writeln!(out, "Applied {} changed records ({updated} rows updated).", changes.len())
        .or_raise(|| ErrorKind::Output)?;
    Ok(updated)
}

/// Dump the table once and write each requested format, independently.
async fn export_all<W: Write>(settings: &Settings, repo: &Repository, out: &mut W, outcome: &mut Outcome) -> Result<()> {
    let requested: Vec<&PathBuf> = [&settings.export_csv, &settings.export_json].into_iter().flatten().collect();
    let table = match repo.dump().await {
        Ok(table) => table,
        Err(e) => {
            tracing::error!(error = ?e, "Could not read the table for export");
            writeln!(out, "Export skipped: could not read table '{}': {}", repo.table(), *e)
                .or_raise(|| ErrorKind::Output)?;
            outcome.failed_exports.extend(requested.into_iter().cloned());
            return Ok(());
        },
    };
    if let Some(path) = &settings.export_csv {
        write_export(out, outcome, &table, path, "CSV", export::export_csv)?;
    }
    if let Some(path) = &settings.export_json {
        write_export(out, outcome, &table, path, "JSON", export::export_json)?;
    }
    Ok(())
}

fn write_export<W: Write>(
    out: &mut W,
    outcome: &mut Outcome,
    table: &Table,
    path: &Path,
    format: &str,
    export: fn(&Table, &Path) -> scrub_cleanup::error::Result<()>,
) -> Result<()> {
    match export(table, path) {
        Ok(()) => {
            writeln!(out, "Exported {} records as {format} to {}", table.len(), path.display())
                .or_raise(|| ErrorKind::Output)?;
            outcome.exported.push(path.to_path_buf());
        },
        Err(e) => {
            tracing::error!(error = ?e, "{format} export failed");
            writeln!(out, "{format} export failed: {}", *e).or_raise(|| ErrorKind::Output)?;
            outcome.failed_exports.push(path.to_path_buf());
        },
    }
    Ok(())
}
