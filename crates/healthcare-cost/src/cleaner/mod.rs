//! Cleaning steps applied to the raw record table.
//!
//! This module provides:
//! - Header normalization (trimming stray whitespace from column names)
//! - Text value trimming
//! - Monetary parsing (currency text to Float64)
//!
//! Every step mutates the table in place and keeps the column set intact.

mod headers;
mod monetary;

pub use headers::{normalize_headers, trim_text_values};
pub use monetary::{parse_monetary_columns, parse_monetary_value};
