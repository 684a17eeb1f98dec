//! The analysis side of a cleanup run: work out what would change, show it,
//! and export the catalog.

mod detect;
pub mod error;
pub mod export;
mod report;

pub use crate::detect::{Analysis, FieldEdit, Preview, analyze};
