//! Session metadata (`info.csv`)
//!
//! Every session archive carries a two-line `info.csv`:
//!
//! ```text
//! date,tag,comment,unit,reps,work dur.,pause btw. reps,sets,pause btw. sets,type
//! 2024-15-03 10:00:00,PullUp,,kg,2,5,3,1,10,iso
//! ```
//!
//! The device writes the date as `YYYY-DD-MM`, day before month.

use crate::error::SessionError;
use chrono::NaiveDateTime;

pub const INFO_FILE: &str = "info.csv";

/// Timestamp layout used by the export.
pub const TIMESTAMP_FORMAT: &str = "%Y-%d-%m %H:%M:%S";

const DATE_COLUMN: usize = 0;
const SETS_COLUMN: usize = 7;

#[derive(Debug, Clone, PartialEq)]
pub struct SessionMetadata {
    pub timestamp: NaiveDateTime,
    /// Saved session name, used as the exercise name
    pub tag: String,
    pub comment: String,
    pub unit: String,
    pub reps: String,
    /// Seconds of active hold per rep, copied verbatim
    pub work_duration: String,
    /// Seconds of rest between reps, copied verbatim
    pub pause_duration: String,
    pub set_count: u32,
    pub pause_between_sets: String,
    pub kind: String,
}

impl SessionMetadata {
    /// Parse the contents of `info.csv`.
    pub fn parse(contents: &str) -> Result<Self, SessionError> {
        let mut lines = contents.lines().map(|l| l.trim_end_matches('\r'));

        let header: Vec<&str> = lines.next().unwrap_or("").split(',').collect();
        let first = header.get(DATE_COLUMN).copied().unwrap_or("");
        let sets = header.get(SETS_COLUMN).copied().unwrap_or("");
        if first != "date" || sets != "sets" {
            return Err(SessionError::Schema {
                first: first.to_string(),
                sets: sets.to_string(),
            });
        }

        let data = lines
            .next()
            .filter(|l| !l.is_empty())
            .ok_or(SessionError::MissingDataLine)?;
        let fields: Vec<&str> = data.split(',').collect();
        let field = |i: usize| fields.get(i).copied().unwrap_or("").to_string();

        let raw_sets = field(SETS_COLUMN);
        let set_count = match raw_sets.trim().parse::<u32>() {
            Ok(n) if n > 0 => n,
            _ => return Err(SessionError::InvalidSetCount(raw_sets)),
        };

        let raw_timestamp = field(DATE_COLUMN);
        let timestamp = NaiveDateTime::parse_from_str(raw_timestamp.trim(), TIMESTAMP_FORMAT)
            .map_err(|_| SessionError::InvalidTimestamp(raw_timestamp.clone()))?;

        Ok(Self {
            timestamp,
            tag: field(1),
            comment: field(2),
            unit: field(3),
            reps: field(4),
            work_duration: field(5),
            pause_duration: field(6),
            set_count,
            pause_between_sets: field(8),
            kind: field(9),
        })
    }

    /// Name of the data file for a 1-based set index.
    pub fn set_file_name(set: u32) -> String {
        format!("data_set_{}.csv", set)
    }
}
