//! Spreadsheet-driven batch resolution.
//!
//! Reads (gene, variant) rows from a CSV/TSV or Excel file, resolves them
//! one at a time with a pause between requests, and writes one output row
//! per input row. Failed rows carry an `Error` cell instead of aborting
//! the batch.

mod driver;
mod input;
mod output;

pub use driver::{BatchDriver, BatchRow, BatchSummary, FixedDelay, NoDelay, Pacer, batch_columns};
pub use input::{parse_delimited, read_queries};
pub use output::{OutputFormat, write_results, write_to};
