//! Decide which records change, and how.

use scrub_catalog::{Change, Record, RecordId};
use scrub_normalize::{Mode, normalize};
use tracing::instrument;

/// What cleaning does to one field.
#[derive(Debug, PartialEq, Eq)]
enum Cleaned {
    /// Already clean.
    Same,
    /// Cleaning would leave nothing behind; the original is kept.
    Emptied,
    Changed(String),
}
impl Cleaned {
    fn of(original: Option<&str>, mode: Mode) -> Self {
        let original = original.unwrap_or_default();
        let cleaned = normalize(original, mode);
        if cleaned == original {
            Self::Same
        } else if cleaned.is_empty() {
            Self::Emptied
        } else {
            Self::Changed(cleaned)
        }
    }

    fn is_changed(&self) -> bool {
        matches!(self, Self::Changed(_))
    }

    /// The value to store: the cleaned one, or else the original untouched.
    fn resolve(self, original: &Option<String>) -> Option<String> {
        match self {
            Self::Changed(cleaned) => Some(cleaned),
            Self::Same | Self::Emptied => original.clone(),
        }
    }
}

/// One field's value before and after cleaning.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldEdit {
    pub before: Option<String>,
    pub after: Option<String>,
}

/// A changed record, as shown to the user before anything is written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Preview {
    pub id: RecordId,
    pub title: FieldEdit,
    pub author: FieldEdit,
}

/// Outcome of comparing every record against its cleaned form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Analysis {
    /// Records examined.
    pub total: usize,
    /// Records with at least one changed field.
    pub changed: usize,
    pub changed_title: usize,
    pub changed_author: usize,
    /// Fields left as they were because cleaning would have emptied them.
    /// These are not counted as changed.
    pub kept: usize,
    /// The first changed records, in record order, at most as many as asked for.
    pub preview: Vec<Preview>,
    /// Every change, in record order.
    pub changes: Vec<Change>,
}

impl Analysis {
    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }
}

/// Clean every record's title and author under `mode` and collect the
/// differences. Records are only read.
///
/// Comparison is exact string equality with the original (a NULL field
/// compares as empty). A field whose cleaned value would be empty keeps its
/// original value and does not count as changed, so a [`Change`] never blanks
/// out a field.
#[instrument(skip(records), fields(records = records.len()))]
pub fn analyze(records: &[Record], mode: Mode, preview_limit: usize) -> Analysis {
    let mut analysis = Analysis { total: records.len(), ..Analysis::default() };
    for record in records {
        let title = Cleaned::of(record.title.as_deref(), mode);
        let author = Cleaned::of(record.author.as_deref(), mode);
        analysis.kept += [&title, &author].into_iter().filter(|c| **c == Cleaned::Emptied).count();
        if !title.is_changed() && !author.is_changed() {
            continue;
        }
        analysis.changed += 1;
        analysis.changed_title += usize::from(title.is_changed());
        analysis.changed_author += usize::from(author.is_changed());
        let change =
            Change { id: record.id, title: title.resolve(&record.title), author: author.resolve(&record.author) };
        if analysis.preview.len() < preview_limit {
            analysis.preview.push(Preview {
                id: record.id,
                title: FieldEdit { before: record.title.clone(), after: change.title.clone() },
                author: FieldEdit { before: record.author.clone(), after: change.author.clone() },
            });
        }
        analysis.changes.push(change);
    }
    tracing::debug!(
        changed = analysis.changed,
        title = analysis.changed_title,
        author = analysis.changed_author,
        kept = analysis.kept,
        "Analysis complete"
    );
    analysis
}
