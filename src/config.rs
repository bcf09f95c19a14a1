//! Input and output locations
//!
//! Exports usually pile up in one folder, so a default search directory can
//! be set once through `TINDEQ_PATH`. With it set, the archive argument may
//! be a bare file name, or be left out to pick the newest export there.

use crate::error::ConsolidateError;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

/// Environment variable naming the default search directory.
pub const SEARCH_DIR_ENV: &str = "TINDEQ_PATH";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }

    /// Formats selected by the `--csv`/`--json` flags. CSV when neither is set.
    pub fn selected(csv: bool, json: bool) -> Vec<OutputFormat> {
        match (csv, json) {
            (false, false) | (true, false) => vec![OutputFormat::Csv],
            (false, true) => vec![OutputFormat::Json],
            (true, true) => vec![OutputFormat::Csv, OutputFormat::Json],
        }
    }
}

/// Work out which archive to read.
///
/// - An existing path is used as is.
/// - A relative path that does not exist is looked up in `search_dir`.
/// - No path at all means the newest `.zip` directly inside `search_dir`.
pub fn resolve_archive(
    archive: Option<&Path>,
    search_dir: Option<&Path>,
) -> Result<PathBuf, ConsolidateError> {
    match (archive, search_dir) {
        (Some(path), Some(dir)) if !path.exists() && path.is_relative() => Ok(dir.join(path)),
        (Some(path), _) => Ok(path.to_path_buf()),
        (None, Some(dir)) => newest_zip(dir),
        (None, None) => newest_zip(Path::new(".")),
    }
}

/// Most recently modified `.zip` directly inside `dir`. Ties go to the
/// lexically last name.
pub fn newest_zip(dir: &Path) -> Result<PathBuf, ConsolidateError> {
    WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("zip"))
                .unwrap_or(false)
        })
        .map(|e| {
            let modified = e
                .metadata()
                .ok()
                .and_then(|m| m.modified().ok())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            (modified, e.into_path())
        })
        .max()
        .map(|(_, path)| path)
        .ok_or_else(|| ConsolidateError::NoArchive {
            dir: dir.to_path_buf(),
        })
}

/// `<out_dir or archive dir>/<archive stem>.<ext>`
pub fn output_path(archive: &Path, out_dir: Option<&Path>, format: OutputFormat) -> PathBuf {
    let mut name = archive
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| "tindeq".into());
    name.push(".");
    name.push(format.extension());

    let dir = out_dir
        .map(Path::to_path_buf)
        .or_else(|| archive.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    dir.join(name)
}
