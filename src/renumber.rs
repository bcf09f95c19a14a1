//! Set renumbering
//!
//! The device saves one session per start/stop of the recorder. People often
//! do several real sets back to back without restarting it, and on the other
//! hand save one session per set. Neither case is marked in the export, so
//! sets are reconstructed from time gaps: within one calendar day, every gap
//! longer than the threshold starts a new set.
//!
//! ```text
//! time      set   gap      gaps so far   new set
//! 10:00:00   1     -            0           1
//! 10:00:30   1    30s           0           1
//! 10:02:00   1    90s           1           2
//! 10:02:00   2     0s           1           3
//! ```
//!
//! Rows from different exercises on the same day are not told apart; if
//! they interleave in time they are grouped by the same rule.

use crate::export::MeasurementRow;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

/// Default gap between two real sets, in seconds.
pub const DEFAULT_GAP_SECS: i64 = 60;

/// Add to each row's `set` the number of gaps longer than `threshold` seen
/// so far on that row's day. A negative threshold is treated as zero.
///
/// Rows come back in their original order; only `set` changes. Rows sharing
/// a timestamp keep their relative order, and the first row of a day never
/// moves.
pub fn renumber_sets(mut rows: Vec<MeasurementRow>, threshold: TimeDelta) -> Vec<MeasurementRow> {
    let offsets = gap_counts(&rows, threshold);
    for (row, offset) in rows.iter_mut().zip(offsets) {
        row.set += offset;
    }
    rows
}

/// Per-row count of long gaps preceding it on the same day, indexed like
/// `rows`.
fn gap_counts(rows: &[MeasurementRow], threshold: TimeDelta) -> Vec<u32> {
    let threshold = threshold.max(TimeDelta::zero());
    let mut order: Vec<usize> = (0..rows.len()).collect();
    // sort_by_key is stable
    order.sort_by_key(|&i| (rows[i].date, rows[i].time));

    let mut counts = vec![0; rows.len()];
    let mut prev: Option<(NaiveDate, NaiveDateTime)> = None;
    let mut gaps = 0;

    for i in order {
        let row = &rows[i];
        match prev {
            Some((date, time)) if date == row.date => {
                if row.time - time > threshold {
                    gaps += 1;
                }
            }
            _ => gaps = 0,
        }
        counts[i] = gaps;
        prev = Some((row.date, row.time));
    }

    counts
}
