use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use tindeq_consolidator::config::{self, OutputFormat};
use tindeq_consolidator::report::{self, summary};
use tindeq_consolidator::{ConsolidateError, Consolidation, Consolidator};

#[derive(Parser, Debug)]
#[command(name = "tindeq-consolidator")]
#[command(author, version, about = "Flatten a Tindeq export into one CSV/JSON table")]
struct Args {
    /// Export archive (default: newest .zip in the search directory)
    archive: Option<PathBuf>,

    /// Default search directory for exports
    #[arg(long, env = "TINDEQ_PATH")]
    dir: Option<PathBuf>,

    /// Write the table as CSV (default when no format is given)
    #[arg(long)]
    csv: bool,

    /// Write the table as JSON
    #[arg(long)]
    json: bool,

    /// Directory for output files (default: next to the archive)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Seconds between sessions that start a new set
    #[arg(long, default_value = "60")]
    gap_seconds: u64,

    /// Number of parallel workers (default: number of CPUs)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Print a per-day summary
    #[arg(long)]
    summary: bool,

    /// Show detailed progress
    #[arg(short, long)]
    verbose: bool,

    /// Only show errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let args = Args::parse();

    let level = if args.quiet {
        log::LevelFilter::Error
    } else if args.verbose {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    if let Some(jobs) = args.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .ok();
    }

    if let Err(e) = run(&args) {
        eprintln!("\x1b[31mError:\x1b[0m {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), ConsolidateError> {
    let archive = config::resolve_archive(args.archive.as_deref(), args.dir.as_deref())?;

    if !args.quiet {
        eprintln!("\x1b[1mTindeq Consolidator\x1b[0m");
        eprintln!("{}", "─".repeat(70));
        eprintln!("Reading {}\n", archive.display());
    }

    let pb = if !args.quiet {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {pos} session(s) {msg}")
                .unwrap(),
        );
        Some(pb)
    } else {
        None
    };

    let consolidator = Consolidator::new().with_gap_seconds(args.gap_seconds)?;
    let result = consolidator.consolidate_with_progress(&archive, |entry| {
        if let Some(ref pb) = pb {
            pb.inc(1);
            pb.set_message(entry.to_string());
        }
    });

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    let result = result?;

    if !args.quiet {
        print_summary(&result);
    }

    if args.summary {
        let daily = summary::daily(&result.rows);
        summary::write_table(&mut io::stdout().lock(), &daily).map_err(|source| {
            ConsolidateError::Report {
                path: PathBuf::from("<stdout>"),
                source,
            }
        })?;
    }

    for format in OutputFormat::selected(args.csv, args.json) {
        let path = config::output_path(&archive, args.output_dir.as_deref(), format);
        if let Some(dir) = args.output_dir.as_deref() {
            std::fs::create_dir_all(dir).map_err(|source| ConsolidateError::Report {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        report::generate(&path, &result.rows).map_err(|source| ConsolidateError::Report {
            path: path.clone(),
            source,
        })?;
        if !args.quiet {
            eprintln!("\x1b[32mReport saved: {}\x1b[0m", path.display());
        }
    }

    if !args.quiet {
        eprintln!("\n\x1b[90mConsolidation complete.\x1b[0m");
    }

    Ok(())
}

fn print_summary(result: &Consolidation) {
    eprintln!("\n{}", "─".repeat(70));
    eprintln!("\x1b[1mSummary:\x1b[0m");
    eprintln!("  \x1b[32m✓ Sessions:\x1b[0m  {}", result.sessions);
    eprintln!("  \x1b[32m✓ Rows:\x1b[0m      {}", result.rows.len());
    if !result.skipped.is_empty() {
        eprintln!("  \x1b[33m? Skipped:\x1b[0m   {}", result.skipped.len());
        for s in &result.skipped {
            eprintln!("    \x1b[90m{}: {}\x1b[0m", s.entry, s.error);
        }
    }
    if result.malformed_rows > 0 {
        eprintln!("  \x1b[33m? Bad rows:\x1b[0m  {}", result.malformed_rows);
    }
}
