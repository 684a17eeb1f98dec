mod change;
mod record;
mod table;

pub use self::change::Change;
pub use self::record::{Record, RecordId};
pub(crate) use self::record::RecordRow;
pub use self::table::{Cell, Table};
