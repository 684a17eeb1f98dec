//! Human-readable run summary.

use crate::detect::{Analysis, FieldEdit};
use std::fmt::{Display, Formatter, Result as FmtResult};

impl Display for FieldEdit {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "'{}' -> '{}'",
            self.before.as_deref().unwrap_or_default(),
            self.after.as_deref().unwrap_or_default()
        )
    }
}

impl Display for Analysis {
    /// Counts first, then the preview (if any), one block per record.
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        writeln!(f, "Total records: {}", self.total)?;
        writeln!(
            f,
            "Records to change: {} (title: {}, author: {})",
            self.changed, self.changed_title, self.changed_author
        )?;
        if self.kept > 0 {
            writeln!(f, "Fields left as-is because cleaning would empty them: {}", self.kept)?;
        }
        if self.preview.is_empty() {
            return Ok(());
        }
        writeln!(f)?;
        match self.preview.len() < self.changed {
            true => writeln!(f, "Sample changes (first {} of {}):", self.preview.len(), self.changed)?,
            false => writeln!(f, "Changes:")?,
        }
        for preview in &self.preview {
            writeln!(f, "- id={}", preview.id)?;
            writeln!(f, "  Title: {}", preview.title)?;
            writeln!(f, "  Author: {}", preview.author)?;
        }
        Ok(())
    }
}
