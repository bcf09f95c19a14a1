//! Report generation for the consolidated table
//!
//! - **CSV**: one row per repetition value, spreadsheet friendly
//! - **JSON**: the same rows, keyed by row index
//! - **Summary**: per-day overview printed to the terminal
//!
//! # Usage
//!
//! ```ignore
//! use tindeq_consolidator::report;
//!
//! // Format follows the extension
//! report::generate("tindeq.csv", &rows)?;
//! report::generate("tindeq.json", &rows)?;
//! ```

pub mod csv;
pub mod json;
pub mod summary;

use crate::export::MeasurementRow;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Write `rows` to `path`, choosing the format from the extension.
/// Anything other than `.json` is written as CSV.
pub fn generate<P: AsRef<Path>>(path: P, rows: &[MeasurementRow]) -> io::Result<()> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let mut file = BufWriter::new(std::fs::File::create(path)?);

    match ext.as_str() {
        "json" => json::write(&mut file, rows)?,
        _ => csv::write(&mut file, rows)?,
    }
    file.flush()
}
