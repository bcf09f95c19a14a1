//! Dump the structure of a Tindeq export for debugging parse problems

use std::env;
use std::fs::File;
use std::io::BufReader;
use tindeq_consolidator::export::info::{SessionMetadata, INFO_FILE};
use tindeq_consolidator::export::set_data;
use tindeq_consolidator::export::walker::{self, EntryOutcome};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: inspect_export <export.zip> [more.zip ...]");
        std::process::exit(1);
    }

    for path in &args[1..] {
        println!("\n{}", "=".repeat(60));
        println!("EXPORT: {}", path);
        println!("{}", "=".repeat(60));
        if let Err(e) = inspect(path) {
            eprintln!("Failed: {}", e);
        }
    }
}

fn inspect(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let entries = walker::read_entries(BufReader::new(File::open(path)?))?;
    println!("Entries: {}", entries.len());

    for entry in &entries {
        println!("\n{} ({} bytes)", entry.name, entry.bytes.len());

        let mut inner = zip::ZipArchive::new(std::io::Cursor::new(entry.bytes.as_slice()))?;
        let names: Vec<String> = inner.file_names().map(str::to_string).collect();
        println!("  files: {}", names.join(", "));

        if let Ok(mut info) = inner.by_name(INFO_FILE) {
            let mut contents = String::new();
            std::io::Read::read_to_string(&mut info, &mut contents)?;
            match SessionMetadata::parse(&contents) {
                Ok(meta) => println!(
                    "  session: {} \"{}\" sets={} work={}s pause={}s",
                    meta.timestamp, meta.tag, meta.set_count, meta.work_duration, meta.pause_duration
                ),
                Err(e) => println!("  session: INVALID ({})", e),
            }
        }

        for name in names.iter().filter(|n| n.starts_with("data_set_")) {
            let mut file = inner.by_name(name)?;
            let mut contents = String::new();
            std::io::Read::read_to_string(&mut file, &mut contents)?;
            let total = contents.lines().count();
            let significant = contents.lines().filter(|l| set_data::is_significant(l)).count();
            println!("  {}: {} lines, {} Avg/Peak rows", name, total, significant);
        }

        match walker::process_entry(entry)? {
            EntryOutcome::Rows { rows, malformed } => {
                println!("  -> {} values, {} malformed rows", rows.len(), malformed.len())
            }
            EntryOutcome::Skipped(e) => println!("  -> skipped: {}", e),
        }
    }

    Ok(())
}
