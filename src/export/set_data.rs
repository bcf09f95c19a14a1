//! Per-set measurement files (`data_set_<N>.csv`)
//!
//! A set file is mostly raw force samples. Only the aggregate rows matter:
//!
//! ```text
//! Avg L,12.5,13.0,,
//! Peak L,20.1,21.4,,
//! ```
//!
//! The label splits into measure kind and hand. Every field after it, except
//! the last one, is one repetition. The last field is an artifact of the
//! exporter and never holds a value.

use super::info::SessionMetadata;
use super::Measure;
use crate::error::MalformedRow;
use chrono::NaiveDateTime;

/// One repetition value before empty-filtering and numeric coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMeasurement {
    pub time: NaiveDateTime,
    pub exercise: String,
    pub duration_work: String,
    pub duration_pause: String,
    pub set: u32,
    pub hand: String,
    pub rep: u32,
    pub measure: Measure,
    pub value: String,
}

#[derive(Debug, Default)]
pub struct SetExtraction {
    pub rows: Vec<RawMeasurement>,
    pub malformed: Vec<MalformedRow>,
}

/// True for rows carrying per-rep aggregates rather than raw samples.
pub fn is_significant(line: &str) -> bool {
    Measure::ALL
        .iter()
        .any(|m| line.strip_prefix(m.as_str()).is_some_and(|rest| rest.starts_with(' ')))
}

/// Extract all repetition values from one set file.
pub fn extract(contents: &str, session: &SessionMetadata, set: u32) -> SetExtraction {
    let mut out = SetExtraction::default();

    for (idx, line) in contents.split('\n').enumerate() {
        let line = line.trim_end_matches('\r');
        if !is_significant(line) {
            continue;
        }

        let fields: Vec<&str> = line.split(',').collect();
        let Some((measure, hand)) = split_label(fields[0]) else {
            out.malformed.push(MalformedRow {
                line: idx + 1,
                label: fields[0].to_string(),
            });
            continue;
        };

        let last = fields.len().saturating_sub(1);
        for (rep, value) in fields.iter().enumerate().take(last).skip(1) {
            out.rows.push(RawMeasurement {
                time: session.timestamp,
                exercise: session.tag.clone(),
                duration_work: session.work_duration.clone(),
                duration_pause: session.pause_duration.clone(),
                set,
                hand: hand.to_string(),
                rep: rep as u32,
                measure,
                value: value.to_string(),
            });
        }
    }

    out
}

/// `"Avg L"` -> `(Avg, "L")`. Anything but exactly two space-separated
/// tokens is rejected.
fn split_label(label: &str) -> Option<(Measure, &str)> {
    let mut parts = label.split(' ');
    let measure = Measure::from_token(parts.next()?)?;
    let hand = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    Some((measure, hand))
}
