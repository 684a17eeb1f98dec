//! Command-line arguments

use crate::error::{ErrorKind, Result};
use crate::run::Settings;
use clap::Parser;
use exn::ResultExt;
use scrub_config::Config;
use scrub_normalize::Mode;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub type Flag = Option<Option<PathBuf>>;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Destination {
    /// Export path was given on the command-line
    Explicit(PathBuf),
    /// Export flag was given on the command-line without a path
    Implicit,
    /// Export was omitted from the command-line
    NotSpecified,
}
impl From<Flag> for Destination {
    fn from(value: Flag) -> Self {
        match value {
            Some(Some(p)) if p.as_os_str().is_empty() => Self::Implicit,
            Some(Some(p)) => Self::Explicit(p),
            Some(None) => Self::Implicit,
            None => Self::NotSpecified,
        }
    }
}
impl Destination {
    pub fn resolve(self, configured: &Path) -> Option<PathBuf> {
        match self {
            Self::Explicit(p) => Some(p),
            Self::Implicit => Some(configured.to_path_buf()),
            Self::NotSpecified => None,
        }
    }
}

fn parse_mode(s: &str) -> std::result::Result<Mode, String> {
    Mode::from_str(s).map_err(|err| err.to_string())
}

/// Clean bracketed notes and symbol noise out of catalog titles and authors.
///
/// Without --apply nothing is written: the run only reports what would change.
#[derive(Debug, Parser)]
#[command(name = "scrub", version)]
pub struct Cli {
    /// Config file (TOML, YAML or JSON, chosen by extension)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// SQLite catalog to clean
    #[arg(long, value_name = "PATH")]
    pub db: Option<PathBuf>,
    /// Table holding the records
    #[arg(long, value_name = "NAME")]
    pub table: Option<String>,
    /// Snapshot the store, then write all changes in one transaction
    #[arg(long)]
    pub apply: bool,
    /// Number of changed records to show
    #[arg(long, value_name = "N")]
    pub preview: Option<usize>,
    /// Records per UPDATE statement
    #[arg(long, value_name = "N")]
    pub batch_size: Option<usize>,
    /// Cleaning intensity: standard or aggressive
    #[arg(long, value_parser = parse_mode, conflicts_with = "aggressive")]
    pub mode: Option<Mode>,
    /// Shorthand for --mode aggressive
    #[arg(long)]
    pub aggressive: bool,
    /// Export the whole table as CSV (to the configured path if none given)
    #[arg(long, value_name = "PATH")]
    pub export_csv: Option<Option<PathBuf>>,
    /// Export the whole table as JSON (to the configured path if none given)
    #[arg(long, value_name = "PATH")]
    pub export_json: Option<Option<PathBuf>>,
    /// More logging (-v info, -vv debug, -vvv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Load the layered config and put the command-line on top of it.
    pub fn settings(self) -> Result<Settings> {
        let mut config = Config::load(self.config.as_deref()).or_raise(|| ErrorKind::Config)?;
        self.overlay(&mut config);
        config.validate().or_raise(|| ErrorKind::Config)?;
        let export_csv = Destination::from(self.export_csv).resolve(&config.export.csv);
        let export_json = Destination::from(self.export_json).resolve(&config.export.json);
        Ok(Settings { config, apply: self.apply, export_csv, export_json })
    }

    fn overlay(&self, config: &mut Config) {
        if let Some(db) = &self.db {
            config.store = db.clone();
        }
        if let Some(table) = &self.table {
            config.table = table.clone();
        }
        if let Some(preview) = self.preview {
            config.preview = preview;
        }
        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }
        if self.aggressive {
            config.mode = Mode::Aggressive;
        } else if let Some(mode) = self.mode {
            config.mode = mode;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use figment::Jail;
    use rstest::rstest;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("scrub").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[rstest]
    #[case(None, Destination::NotSpecified)]
    #[case(Some(None), Destination::Implicit)]
    #[case(Some(Some(PathBuf::new())), Destination::Implicit)]
    #[case(Some(Some(PathBuf::from("out.csv"))), Destination::Explicit(PathBuf::from("out.csv")))]
    fn test_destination(#[case] flag: Flag, #[case] expected: Destination) {
        assert_eq!(Destination::from(flag), expected);
    }

    #[rstest]
    #[case(Destination::Explicit(PathBuf::from("mine.csv")), Some(PathBuf::from("mine.csv")))]
    #[case(Destination::Implicit, Some(PathBuf::from("configured.csv")))]
    #[case(Destination::NotSpecified, None)]
    fn test_destination_resolve(#[case] destination: Destination, #[case] expected: Option<PathBuf>) {
        assert_eq!(destination.resolve(Path::new("configured.csv")), expected);
    }

    #[rstest]
    #[case(&[], None)]
    #[case(&["--export-csv"], Some(None))]
    #[case(&["--export-csv", "out.csv"], Some(Some(PathBuf::from("out.csv"))))]
    #[case(&["--export-csv=out.csv"], Some(Some(PathBuf::from("out.csv"))))]
    fn test_export_flag_parsing(#[case] args: &[&str], #[case] expected: Flag) {
        assert_eq!(parse(args).export_csv, expected);
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&[]);
        assert!(!cli.apply);
        assert!(!cli.aggressive);
        assert_eq!(cli.mode, None);
        assert_eq!(cli.verbose, 0);
    }

    #[rstest]
    #[case(&["--mode", "aggressive"], Mode::Aggressive)]
    #[case(&["--mode", "standard"], Mode::Standard)]
    #[case(&["--aggressive"], Mode::Aggressive)]
    #[case(&[], Mode::Standard)]
    fn test_mode_overlay(#[case] args: &[&str], #[case] expected: Mode) {
        let mut config = Config::default();
        parse(args).overlay(&mut config);
        assert_eq!(config.mode, expected);
    }

    #[test]
    fn test_overlay() {
        let mut config = Config::default();
        parse(&["--db", "other.db", "--table", "library", "--preview", "3", "--batch-size", "7"])
            .overlay(&mut config);
        assert_eq!(config.store, PathBuf::from("other.db"));
        assert_eq!(config.table, "library");
        assert_eq!(config.preview, 3);
        assert_eq!(config.batch_size, 7);
    }

    #[rstest]
    #[case(&["--mode", "gentle"])]
    #[case(&["--mode", "aggressive", "--aggressive"])]
    #[case(&["--preview", "-1"])]
    fn test_rejected_arguments(#[case] args: &[&str]) {
        assert!(Cli::try_parse_from(std::iter::once("scrub").chain(args.iter().copied())).is_err());
    }

    #[test]
    fn test_command_line_replaces_invalid_environment() {
        Jail::expect_with(|jail| {
            jail.set_env("SCRUB_BATCH_SIZE", "0");
            let settings = parse(&["--batch-size", "500"]).settings().unwrap();
            assert_eq!(settings.config.batch_size, 500);
            // Without the override the environment value is still rejected.
            let err = parse(&[]).settings().unwrap_err();
            assert_eq!(*err, ErrorKind::Config);
            Ok(())
        });
    }

    #[test]
    fn test_export_destinations_follow_config() {
        Jail::expect_with(|jail| {
            jail.set_env("SCRUB_EXPORT__CSV", "configured.csv");
            let settings = parse(&["--export-csv"]).settings().unwrap();
            assert_eq!(settings.export_csv, Some(PathBuf::from("configured.csv")));
            assert_eq!(settings.export_json, None);
            Ok(())
        });
    }

    #[test]
    fn test_verbosity_counts() {
        assert_eq!(parse(&["-vv"]).verbose, 2);
    }
}
