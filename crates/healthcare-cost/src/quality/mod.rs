//! Data quality inspection.

mod checker;

pub use checker::{ColumnMissing, IntegrityChecker, MissingValueReport};
