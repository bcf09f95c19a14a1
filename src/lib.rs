//! tindeq-consolidator - Flatten Tindeq Progressor exports
//!
//! The Tindeq app exports training history as a zip of zips: one inner
//! archive per saved session, each holding an `info.csv` with the session
//! settings and one `data_set_<N>.csv` per set. This crate turns such an
//! export into one long-format table, one row per hand, measure and
//! repetition, ready for a spreadsheet or a notebook.
//!
//! # Quick Start
//!
//! ```no_run
//! use tindeq_consolidator::{report, Consolidator};
//!
//! let result = Consolidator::new().consolidate("tindeq.zip")?;
//! for skipped in &result.skipped {
//!     eprintln!("skipped {}: {}", skipped.entry, skipped.error);
//! }
//! report::generate("tindeq.csv", &result.rows).expect("write report");
//! # Ok::<(), tindeq_consolidator::ConsolidateError>(())
//! ```
//!
//! # Output Columns
//!
//! | Column | Meaning |
//! |--------|---------|
//! | Date, Time | Session start |
//! | Exercise | Saved session name |
//! | DurationWork, DurationPause | Hang / rest seconds per rep |
//! | Set | Set number, split on gaps over one minute |
//! | Hand | Hand token from the device |
//! | Rep | 1-based repetition |
//! | Measure | `Avg` or `Peak` |
//! | Value | Force reading |
//!
//! # Modules
//!
//! - [`export`]: archive walking, metadata and set file parsing
//! - [`renumber`]: set reconstruction from time gaps
//! - [`report`]: CSV, JSON and summary output
//! - [`config`]: archive lookup and output naming

pub mod config;
pub mod error;
pub mod export;
pub mod renumber;
pub mod report;

pub use error::{ConsolidateError, MalformedRow, SessionError};
pub use export::{Consolidation, Consolidator, Measure, MeasurementRow, SkippedSession};
