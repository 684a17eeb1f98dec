mod cli;
mod error;
mod run;

use crate::cli::Cli;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Diagnostics go to stderr; stdout is kept for the report.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();
}

fn fail(err: &error::Error) -> ExitCode {
    eprintln!("Error: {err:?}");
    ExitCode::from(err.exit_code())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = match cli.settings() {
        Ok(settings) => settings,
        Err(err) => return fail(&err),
    };
    tracing::debug!(?settings, "Settings resolved");
    if settings.apply {
        tracing::info!(store = %settings.config.store.display(), "Changes will be written to the store");
    }

    match run::run(&settings, &mut std::io::stdout()).await {
        Ok(outcome) => {
            tracing::debug!(
                snapshot = ?outcome.snapshot,
                updated = ?outcome.updated,
                exported = outcome.exported.len(),
                failed_exports = outcome.failed_exports.len(),
                "Run complete"
            );
            ExitCode::SUCCESS
        },
        Err(err) => fail(&err),
    }
}
