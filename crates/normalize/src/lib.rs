//! Title/author cleanup for catalog records.
//!
//! [`normalize`] runs a fixed pipeline over a single field value:
//!
//! 1. **Bracketed spans** (`(...)`, `[...]`, `{...}`, `<...>`) are removed
//!    together with their content, innermost first, until none are left.
//! 2. **Math symbols** (Unicode `Sm` and `Sk`, plus a literal list of
//!    operators and relations) are dropped.
//! 3. **Punctuation and symbols** (`P*`, `S*`, plus a literal list of quotes,
//!    bullets, fractions, etc.) are dropped, but only in [`Mode::Aggressive`].
//! 4. **Whitespace** is collapsed and stray separators (`-–—:;,.`) are trimmed
//!    from both ends.
//!
//! The pipeline only ever removes characters (or replaces a run of them with a
//! single space), so the output is never longer than the input, and running it
//! twice gives the same result as running it once.
//!
//! ```
//! use scrub_normalize::{Mode, normalize};
//! assert_eq!(normalize("Title (notes) Subtitle [2020]", Mode::Standard), "Title Subtitle");
//! assert_eq!(normalize("Rock 'n' Roll!", Mode::Aggressive), "Rock n Roll");
//! assert_eq!(normalize(None::<&str>, Mode::Standard), "");
//! ```

mod consts;
pub mod error;
mod pipeline;

use crate::error::{Error, ErrorKind};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use tracing::instrument;

/// How hard to scrub.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(rename_all = "lowercase"))]
pub enum Mode {
    /// Brackets and math symbols only.
    #[default]
    Standard,
    /// Additionally strips all punctuation and symbols, keeping letters,
    /// digits and whitespace.
    Aggressive,
}
impl FromStr for Mode {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" | "default" => Ok(Self::Standard),
            "aggressive" => Ok(Self::Aggressive),
            _ => exn::bail!(ErrorKind::UnknownMode(s.to_string())),
        }
    }
}
impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Aggressive => write!(f, "aggressive"),
        }
    }
}

/// Clean a single field value.
///
/// Absent input is treated as empty. The result may be empty (for example a
/// title that was nothing but a bracketed note); deciding what to store in
/// that case is up to the caller.
#[instrument(level = "trace")]
pub fn normalize<'a>(text: impl Into<Option<&'a str>> + std::fmt::Debug, mode: Mode) -> String {
    let Some(text) = text.into() else {
        return String::new();
    };
    let text = pipeline::remove_bracketed(text);
    let text = pipeline::remove_math_symbols(&text);
    let text = match mode {
        Mode::Standard => text,
        Mode::Aggressive => pipeline::remove_punctuation_and_symbols(&text),
    };
    pipeline::normalize_whitespace(&text)
}
