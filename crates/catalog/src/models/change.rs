use crate::models::RecordId;

/// A pending update for one record.
///
/// Both fields are always written. A field that isn't being cleaned carries
/// its original value (including `None`), so applying a change never touches
/// more than it has to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Change {
    pub id: RecordId,
    pub title: Option<String>,
    pub author: Option<String>,
}
