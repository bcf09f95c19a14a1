//! Error types
//!
//! Errors come in three weights:
//!
//! - [`ConsolidateError`] aborts the whole run (unreadable archive, corrupt
//!   values, failed report write).
//! - [`SessionError`] drops one session; the walker logs it and moves on.
//! - [`MalformedRow`] drops one measurement row inside a set file.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors: the run stops and nothing is written.
#[derive(Debug, Error)]
pub enum ConsolidateError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{entry}: not a readable archive: {source}")]
    Archive {
        entry: String,
        #[source]
        source: zip::result::ZipError,
    },

    #[error(
        "non-numeric value {value:?} ({exercise}, {time}, set {set}, {measure} {hand}, rep {rep})"
    )]
    ValueCoercion {
        exercise: String,
        time: String,
        set: u32,
        measure: String,
        hand: String,
        rep: u32,
        value: String,
    },

    #[error("gap threshold of {0} seconds is out of range")]
    InvalidGap(u64),

    #[error("no export archive found in {}", dir.display())]
    NoArchive { dir: PathBuf },

    #[error("failed to write report {}: {source}", path.display())]
    Report {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ConsolidateError {
    pub(crate) fn archive(entry: impl Into<String>, source: zip::result::ZipError) -> Self {
        Self::Archive {
            entry: entry.into(),
            source,
        }
    }
}

/// Per-session errors. The session contributes no rows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("information file not in expected format (found {first:?} / {sets:?})")]
    Schema { first: String, sets: String },

    #[error("info.csv not found")]
    MissingInfo,

    #[error("info.csv has no data line")]
    MissingDataLine,

    #[error("set count {0:?} is not a positive integer")]
    InvalidSetCount(String),

    #[error("timestamp {0:?} does not match YYYY-DD-MM HH:MM:SS")]
    InvalidTimestamp(String),

    #[error("{0} is not valid UTF-8")]
    NotUtf8(String),

    #[error("{0} declared but missing")]
    MissingSetFile(String),
}

/// A significant (`Avg `/`Peak `) row whose label is not `<measure> <hand>`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: malformed measurement row {label:?}")]
pub struct MalformedRow {
    pub line: usize,
    pub label: String,
}
