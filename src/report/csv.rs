//! CSV table output

use crate::export::MeasurementRow;
use std::io::{self, Write};

/// Output columns, in order.
pub const COLUMNS: [&str; 10] = [
    "Date",
    "Time",
    "Exercise",
    "DurationWork",
    "DurationPause",
    "Set",
    "Hand",
    "Rep",
    "Measure",
    "Value",
];

pub fn write<W: Write>(writer: &mut W, rows: &[MeasurementRow]) -> io::Result<()> {
    // Header written by hand so an empty table still has one
    let mut wtr = ::csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(COLUMNS)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}
