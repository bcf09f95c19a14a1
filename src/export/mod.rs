//! Export ingestion
//!
//! Turns one Tindeq export (a zip of per-session zips) into the flat,
//! long-format measurement table.
//!
//! # Pipeline
//!
//! 1. [`walker::read_entries`] reads the outer archive in archive order.
//! 2. [`walker::process_entry`] parses each session's `info.csv`
//!    ([`info::SessionMetadata`]) and its `data_set_<N>.csv` files
//!    ([`set_data::extract`]). Broken sessions are logged and skipped.
//! 3. [`finalize`] drops empty values and coerces the rest to numbers.
//! 4. [`crate::renumber::renumber_sets`] splits sessions into real sets by
//!    time gaps.
//!
//! ```no_run
//! use tindeq_consolidator::Consolidator;
//!
//! let result = Consolidator::new().consolidate("tindeq.zip")?;
//! println!("{} rows from {} sessions", result.rows.len(), result.sessions);
//! # Ok::<(), tindeq_consolidator::ConsolidateError>(())
//! ```

pub mod info;
pub mod set_data;
pub mod walker;

#[cfg(test)]
pub(crate) mod fixtures;

use crate::error::{ConsolidateError, SessionError};
use crate::renumber::{self, DEFAULT_GAP_SECS};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use rayon::prelude::*;
use serde::{Serialize, Serializer};
use set_data::RawMeasurement;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use walker::{EntryOutcome, OuterEntry};

/// Layout of the Time column in every output.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Measure {
    Avg,
    Peak,
}

impl Measure {
    pub const ALL: [Measure; 2] = [Measure::Avg, Measure::Peak];

    pub fn as_str(&self) -> &'static str {
        match self {
            Measure::Avg => "Avg",
            Measure::Peak => "Peak",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == token)
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the output table. Field order is column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MeasurementRow {
    pub date: NaiveDate,
    #[serde(serialize_with = "serialize_time")]
    pub time: NaiveDateTime,
    pub exercise: String,
    pub duration_work: String,
    pub duration_pause: String,
    pub set: u32,
    pub hand: String,
    pub rep: u32,
    pub measure: Measure,
    pub value: f64,
}

fn serialize_time<S: Serializer>(time: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&time.format(TIME_FORMAT))
}

/// A session left out of the table, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSession {
    pub entry: String,
    pub error: SessionError,
}

/// Everything one run produced.
#[derive(Debug, Clone, Default)]
pub struct Consolidation {
    /// Final table, in archive order
    pub rows: Vec<MeasurementRow>,
    /// Sessions that contributed rows
    pub sessions: usize,
    pub skipped: Vec<SkippedSession>,
    /// Significant rows dropped because their label was malformed
    pub malformed_rows: usize,
}

/// Drop empty values and coerce the rest to `f64`.
///
/// Runs once over the whole accumulated table. A value that survives the
/// empty filter but does not parse means the extraction went wrong, so the
/// run fails.
pub fn finalize(raw: Vec<RawMeasurement>) -> Result<Vec<MeasurementRow>, ConsolidateError> {
    raw.into_iter()
        .filter(|r| !r.value.is_empty())
        .map(|r| {
            let value = match r.value.trim().parse::<f64>() {
                Ok(v) => v,
                Err(_) => {
                    return Err(ConsolidateError::ValueCoercion {
                        time: r.time.format(TIME_FORMAT).to_string(),
                        set: r.set,
                        measure: r.measure.to_string(),
                        rep: r.rep,
                        exercise: r.exercise,
                        hand: r.hand,
                        value: r.value,
                    })
                }
            };
            Ok(MeasurementRow {
                date: r.time.date(),
                time: r.time,
                exercise: r.exercise,
                duration_work: r.duration_work,
                duration_pause: r.duration_pause,
                set: r.set,
                hand: r.hand,
                rep: r.rep,
                measure: r.measure,
                value,
            })
        })
        .collect()
}

/// Export consolidator.
///
/// Builder-style configuration; the defaults match the device's behaviour
/// (one-minute gap between real sets).
#[derive(Debug, Clone)]
pub struct Consolidator {
    gap_threshold: TimeDelta,
}

impl Default for Consolidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Consolidator {
    pub fn new() -> Self {
        Self {
            gap_threshold: TimeDelta::seconds(DEFAULT_GAP_SECS),
        }
    }

    /// Gap (in seconds) above which two same-day rows belong to different sets.
    pub fn with_gap_seconds(mut self, secs: u64) -> Result<Self, ConsolidateError> {
        self.gap_threshold = i64::try_from(secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .ok_or(ConsolidateError::InvalidGap(secs))?;
        Ok(self)
    }

    pub fn gap_threshold(&self) -> TimeDelta {
        self.gap_threshold
    }

    /// Consolidate the export at `path`.
    pub fn consolidate<P: AsRef<Path>>(&self, path: P) -> Result<Consolidation, ConsolidateError> {
        self.consolidate_with_progress(path, |_| {})
    }

    /// Like [`consolidate`](Self::consolidate), calling `on_entry` with each
    /// outer entry's name once it has been processed.
    pub fn consolidate_with_progress<P, F>(
        &self,
        path: P,
        on_entry: F,
    ) -> Result<Consolidation, ConsolidateError>
    where
        P: AsRef<Path>,
        F: Fn(&str) + Sync,
    {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ConsolidateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.consolidate_reader_with_progress(BufReader::new(file), on_entry)
    }

    /// Consolidate an export from any seekable reader.
    pub fn consolidate_reader<R: Read + Seek>(
        &self,
        reader: R,
    ) -> Result<Consolidation, ConsolidateError> {
        self.consolidate_reader_with_progress(reader, |_| {})
    }

    fn consolidate_reader_with_progress<R, F>(
        &self,
        reader: R,
        on_entry: F,
    ) -> Result<Consolidation, ConsolidateError>
    where
        R: Read + Seek,
        F: Fn(&str) + Sync,
    {
        let entries = walker::read_entries(reader)?;
        log::info!("export holds {} session archive(s)", entries.len());

        // Sessions are independent; collect keeps archive order.
        let outcomes: Vec<(&OuterEntry, EntryOutcome)> = entries
            .par_iter()
            .map(|entry| -> Result<_, ConsolidateError> {
                let outcome = walker::process_entry(entry)?;
                on_entry(&entry.name);
                Ok((entry, outcome))
            })
            .collect::<Result<_, ConsolidateError>>()?;

        let mut result = Consolidation::default();
        let mut raw = Vec::new();

        for (entry, outcome) in outcomes {
            match outcome {
                EntryOutcome::Skipped(error) => {
                    log::warn!("{}: {}", entry.name, error);
                    result.skipped.push(SkippedSession {
                        entry: entry.name.clone(),
                        error,
                    });
                    continue;
                }
                EntryOutcome::Rows { rows, malformed } => {
                    for row in &malformed {
                        log::warn!("{}: {}", entry.name, row);
                    }
                    result.malformed_rows += malformed.len();
                    result.sessions += 1;
                    raw.extend(rows);
                }
            }
        }

        let rows = finalize(raw)?;
        result.rows = renumber::renumber_sets(rows, self.gap_threshold);
        log::info!(
            "{} rows from {} session(s), {} skipped",
            result.rows.len(),
            result.sessions,
            result.skipped.len()
        );

        Ok(result)
    }
}
