//! In-memory export archives for tests

use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub const INFO_HEADER: &str =
    "date,tag,comment,unit,reps,work dur.,pause btw. reps,sets,pause btw. sets,type";

/// Build a zip from `(name, contents)` pairs, in the given order.
pub fn zip_bytes(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, contents) in files {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(contents).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// A session archive with `info.csv` built from `info_data` and one file per
/// entry of `sets`.
pub fn session_zip(info_data: &str, sets: &[&str]) -> Vec<u8> {
    let info = format!("{}\n{}\n", INFO_HEADER, info_data);
    let names: Vec<String> = (1..=sets.len())
        .map(|i| format!("data_set_{}.csv", i))
        .collect();

    let mut files: Vec<(&str, &[u8])> = vec![("info.csv", info.as_bytes())];
    for (name, contents) in names.iter().zip(sets) {
        files.push((name.as_str(), contents.as_bytes()));
    }
    zip_bytes(&files)
}

/// An outer export holding the given session archives.
pub fn export_zip(sessions: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let files: Vec<(&str, &[u8])> = sessions
        .iter()
        .map(|(name, bytes)| (*name, bytes.as_slice()))
        .collect();
    zip_bytes(&files)
}
