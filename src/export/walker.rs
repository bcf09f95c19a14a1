//! Two-level archive traversal
//!
//! The outer zip is read sequentially into memory, one entry at a time.
//! Each entry is then handled on its own: opened as a session zip, its
//! `info.csv` parsed, and every declared set file extracted. Per-session
//! failures are reported back, not raised, so one broken session never
//! costs the rest of the export.

use super::info::{SessionMetadata, INFO_FILE};
use super::set_data::{self, RawMeasurement};
use crate::error::{ConsolidateError, MalformedRow, SessionError};
use std::io::{Cursor, Read, Seek};
use zip::result::ZipError;
use zip::ZipArchive;

/// Name used in diagnostics for the top-level archive.
pub const OUTER: &str = "<export>";

/// One outer entry, read fully into memory.
#[derive(Debug, Clone)]
pub struct OuterEntry {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Result of processing one session archive.
#[derive(Debug)]
pub enum EntryOutcome {
    Rows {
        rows: Vec<RawMeasurement>,
        malformed: Vec<MalformedRow>,
    },
    Skipped(SessionError),
}

/// Read every file entry of the outer archive, in central-directory order.
pub fn read_entries<R: Read + Seek>(reader: R) -> Result<Vec<OuterEntry>, ConsolidateError> {
    let mut outer = ZipArchive::new(reader).map_err(|e| ConsolidateError::archive(OUTER, e))?;
    let mut entries = Vec::with_capacity(outer.len());

    for i in 0..outer.len() {
        let mut file = outer
            .by_index(i)
            .map_err(|e| ConsolidateError::archive(OUTER, e))?;
        if file.is_dir() {
            continue;
        }
        let name = file.name().to_string();
        // Declared sizes are not trusted for pre-allocation
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .map_err(|e| ConsolidateError::archive(name.clone(), ZipError::Io(e)))?;
        entries.push(OuterEntry { name, bytes });
    }

    Ok(entries)
}

/// Process one session archive.
///
/// An entry that is not a zip at all is fatal; everything wrong *inside* a
/// readable session zip only skips that session.
pub fn process_entry(entry: &OuterEntry) -> Result<EntryOutcome, ConsolidateError> {
    let mut inner = ZipArchive::new(Cursor::new(entry.bytes.as_slice()))
        .map_err(|e| ConsolidateError::archive(entry.name.clone(), e))?;

    let session = match read_text(&mut inner, INFO_FILE, &entry.name)? {
        Ok(contents) => match SessionMetadata::parse(&contents) {
            Ok(session) => session,
            Err(e) => return Ok(EntryOutcome::Skipped(e)),
        },
        Err(ReadFailure::Missing) => return Ok(EntryOutcome::Skipped(SessionError::MissingInfo)),
        Err(ReadFailure::NotUtf8) => {
            return Ok(EntryOutcome::Skipped(SessionError::NotUtf8(INFO_FILE.to_string())))
        }
    };

    let mut rows = Vec::new();
    let mut malformed = Vec::new();

    for set in 1..=session.set_count {
        let file_name = SessionMetadata::set_file_name(set);
        let contents = match read_text(&mut inner, &file_name, &entry.name)? {
            Ok(contents) => contents,
            Err(ReadFailure::Missing) => {
                return Ok(EntryOutcome::Skipped(SessionError::MissingSetFile(file_name)))
            }
            Err(ReadFailure::NotUtf8) => {
                return Ok(EntryOutcome::Skipped(SessionError::NotUtf8(file_name)))
            }
        };

        let extracted = set_data::extract(&contents, &session, set);
        rows.extend(extracted.rows);
        malformed.extend(extracted.malformed);
    }

    Ok(EntryOutcome::Rows { rows, malformed })
}

enum ReadFailure {
    Missing,
    NotUtf8,
}

/// Read a named member as text. The outer `Result` is fatal, the inner one
/// is a per-session condition.
fn read_text<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
    entry: &str,
) -> Result<Result<String, ReadFailure>, ConsolidateError> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(Err(ReadFailure::Missing)),
        Err(e) => return Err(ConsolidateError::archive(entry, e)),
    };

    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| ConsolidateError::archive(entry, ZipError::Io(e)))?;

    Ok(String::from_utf8(bytes).map_err(|_| ReadFailure::NotUtf8))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::fixtures::{export_zip, session_zip, zip_bytes};

    const PULLUP: &str = "2024-15-03 10:00:00,PullUp,,kg,2,5,3,1,10,iso";

    fn entry(name: &str, bytes: Vec<u8>) -> OuterEntry {
        OuterEntry {
            name: name.to_string(),
            bytes,
        }
    }

    // ==========================================================================
    // OUTER ARCHIVE
    // ==========================================================================

    #[test]
    fn test_read_entries_preserves_order() {
        let export = export_zip(&[
            ("b.zip", session_zip(PULLUP, &["Avg L,1,"])),
            ("a.zip", session_zip(PULLUP, &["Avg L,2,"])),
            ("c.zip", session_zip(PULLUP, &["Avg L,3,"])),
        ]);
        let entries = read_entries(Cursor::new(export)).unwrap();

        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["b.zip", "a.zip", "c.zip"]);
    }

    #[test]
    fn test_outer_not_a_zip() {
        let err = read_entries(Cursor::new(b"definitely not a zip".to_vec())).unwrap_err();
        assert!(matches!(err, ConsolidateError::Archive { ref entry, .. } if entry == OUTER));
    }

    // ==========================================================================
    // SESSION ARCHIVES
    // ==========================================================================

    #[test]
    fn test_process_entry_all_sets() {
        let info = "2024-15-03 10:00:00,Hang,,kg,2,7,3,2,60,rep";
        let bytes = session_zip(info, &["Avg L,10,11,\nPeak L,12,13,\n", "Avg L,9,\n"]);

        match process_entry(&entry("s.zip", bytes)).unwrap() {
            EntryOutcome::Rows { rows, malformed } => {
                assert_eq!(rows.len(), 5);
                assert!(malformed.is_empty());
                assert_eq!(rows.iter().filter(|r| r.set == 2).count(), 1);
            }
            EntryOutcome::Skipped(e) => panic!("unexpected skip: {}", e),
        }
    }

    #[test]
    fn test_process_entry_bad_header_contributes_nothing() {
        let info = "when,tag,comment,unit,reps,work,pause,sets,pause2,type\n".to_string() + PULLUP;
        let bytes = zip_bytes(&[
            ("info.csv", info.as_bytes()),
            ("data_set_1.csv", &b"Avg L,1,2,"[..]),
        ]);

        let outcome = process_entry(&entry("bad.zip", bytes)).unwrap();
        assert!(matches!(outcome, EntryOutcome::Skipped(SessionError::Schema { .. })));
    }

    #[test]
    fn test_process_entry_missing_set_file() {
        let info = "2024-15-03 10:00:00,Hang,,kg,2,7,3,3,60,rep";
        let bytes = session_zip(info, &["Avg L,1,", "Avg L,2,"]);

        let outcome = process_entry(&entry("short.zip", bytes)).unwrap();
        match outcome {
            EntryOutcome::Skipped(SessionError::MissingSetFile(name)) => {
                assert_eq!(name, "data_set_3.csv")
            }
            other => panic!("expected missing set file, got {:?}", other),
        }
    }

    #[test]
    fn test_process_entry_missing_info() {
        let bytes = zip_bytes(&[("data_set_1.csv", &b"Avg L,1,"[..])]);
        let outcome = process_entry(&entry("noinfo.zip", bytes)).unwrap();

        assert!(matches!(outcome, EntryOutcome::Skipped(SessionError::MissingInfo)));
    }

    #[test]
    fn test_process_entry_info_not_utf8() {
        let bytes = zip_bytes(&[("info.csv", &[0xffu8, 0xfe, 0x00][..])]);
        let outcome = process_entry(&entry("binary.zip", bytes)).unwrap();

        assert!(matches!(outcome, EntryOutcome::Skipped(SessionError::NotUtf8(_))));
    }

    #[test]
    fn test_process_entry_inner_not_a_zip() {
        let err = process_entry(&entry("notes.txt", b"hello".to_vec())).unwrap_err();
        assert!(matches!(err, ConsolidateError::Archive { ref entry, .. } if entry == "notes.txt"));
    }

    #[test]
    fn test_process_entry_reports_malformed_rows() {
        let bytes = session_zip(PULLUP, &["Avg L,1,2,\nPeak left hand,3,4,\n"]);

        match process_entry(&entry("s.zip", bytes)).unwrap() {
            EntryOutcome::Rows { rows, malformed } => {
                assert_eq!(rows.len(), 2);
                assert_eq!(malformed.len(), 1);
                assert_eq!(malformed[0].line, 2);
            }
            EntryOutcome::Skipped(e) => panic!("unexpected skip: {}", e),
        }
    }
}
