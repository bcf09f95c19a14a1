//! JSON output
//!
//! The table is written record-wise, keyed by row index:
//!
//! ```text
//! {
//!     "0": { "Date": "2024-03-15", "Time": "2024-03-15 10:00:00", ... },
//!     "1": { ... }
//! }
//! ```

use crate::export::MeasurementRow;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::io::{self, Write};

/// Rows serialized as an index-keyed map, in table order.
pub struct IndexedRows<'a>(pub &'a [MeasurementRow]);

impl Serialize for IndexedRows<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (i, row) in self.0.iter().enumerate() {
            map.serialize_entry(&i.to_string(), row)?;
        }
        map.end()
    }
}

pub fn write<W: Write>(writer: &mut W, rows: &[MeasurementRow]) -> io::Result<()> {
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut *writer, formatter);
    IndexedRows(rows).serialize(&mut ser)?;
    writeln!(writer)?;
    Ok(())
}
