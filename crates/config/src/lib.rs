//! Layered configuration for scrub.
//!
//! Sources, lowest to highest priority:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. A config file: the one passed to [`Config::load`], otherwise
//!    `config.toml` in the platform config directory if it exists
//! 3. Environment variables prefixed with `SCRUB_`; nested keys use a double
//!    underscore (`SCRUB_EXPORT__CSV`)
//!
//! Command-line flags are applied on top by the binary.
//!
//! Whether to write to the store is deliberately *not* configurable here: it
//! has to be asked for on every run.

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::{OptionExt, ResultExt};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use scrub_catalog::MAX_BATCH_SIZE;
use scrub_normalize::Mode;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "SCRUB_";

/// Where exports go when requested without an explicit path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub csv: PathBuf,
    pub json: PathBuf,
}
impl Default for ExportConfig {
    fn default() -> Self {
        Self { csv: PathBuf::from("./ebooks_dataset.csv"), json: PathBuf::from("./ebooks_dataset.json") }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite catalog file.
    pub store: PathBuf,
    /// Table holding the records.
    pub table: String,
    pub mode: Mode,
    /// How many changed records to show before (or instead of) applying.
    pub preview: usize,
    /// Records per `UPDATE` statement.
    pub batch_size: usize,
    pub export: ExportConfig,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            store: PathBuf::from("./library.db"),
            table: "books".to_string(),
            mode: Mode::Standard,
            preview: 20,
            batch_size: 1000,
            export: ExportConfig::default(),
        }
    }
}

impl Config {
    /// Load the configuration from every layer below the command-line.
    ///
    /// `file` must exist if given. Without it, the platform default location
    /// is used when there's a file there and skipped otherwise. Values are not
    /// checked here: call [`validate`](Self::validate) once any overrides have
    /// been applied on top.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let file = match file {
            Some(path) if !path.is_file() => exn::bail!(ErrorKind::NotFound(path.to_path_buf())),
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path().filter(|path| path.is_file()),
        };
        match &file {
            Some(path) => tracing::debug!(path = %path.display(), "Loading config file"),
            None => tracing::debug!("No config file; using defaults and environment"),
        }
        Self::figment(file.as_deref()).extract().or_raise(|| ErrorKind::Load)
    }

    /// `config.toml` in the platform config directory (e.g.
    /// `~/.config/scrub/config.toml` on Linux).
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "scrub").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// The merged sources, before extraction. The file format follows the
    /// extension; anything unrecognised is read as TOML.
    pub fn figment(file: Option<&Path>) -> Figment {
        let figment = Figment::from(Serialized::defaults(Self::default()));
        let figment = match file {
            Some(path) => match path.extension().and_then(|e| e.to_str()).map(str::to_lowercase).as_deref() {
                Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
                Some("json") => figment.merge(Json::file(path)),
                _ => figment.merge(Toml::file(path)),
            },
            None => figment,
        };
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.store.as_os_str().is_empty() {
            exn::bail!(ErrorKind::Invalid { key: "store", reason: "must not be empty".to_string() });
        }
        if self.table.is_empty() {
            exn::bail!(ErrorKind::Invalid { key: "table", reason: "must not be empty".to_string() });
        }
        if !(1..=MAX_BATCH_SIZE).contains(&self.batch_size) {
            exn::bail!(ErrorKind::Invalid {
                key: "batch_size",
                reason: format!("must be between 1 and {MAX_BATCH_SIZE}, got {}", self.batch_size),
            });
        }
        Ok(())
    }

    /// [`batch_size`](Self::batch_size) as the mutator wants it.
    pub fn batch_size(&self) -> Result<NonZeroUsize> {
        self.validate()?;
        NonZeroUsize::new(self.batch_size)
            .ok_or_raise(|| ErrorKind::Invalid { key: "batch_size", reason: "must not be zero".to_string() })
    }
}
