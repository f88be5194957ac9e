//! Reading and writing the record table.
//!
//! Both directions use comma-delimited text with a header row. File handles
//! are dropped before returning, on success and on failure alike.

mod loader;
mod writer;

pub use loader::{load_table, load_table_with};
pub use writer::save_table;
