// src/main.rs
mod batch;
mod extractors;
mod pdf;
mod storage;
mod utils;
mod validate;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use pdf::TableSettings;
use utils::AppError;

/// Command Line Interface for the index factsheet extractor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Minimum run of spaces that separates two table cells
    #[arg(long, global = true, default_value_t = 2)]
    min_column_gap: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Move corrupted or non-PDF downloads out of the factsheet directory
    Validate {
        /// Directory holding the downloaded PDFs
        #[arg(default_value = "Factsheets")]
        source: PathBuf,

        /// Where corrupted files are moved
        #[arg(default_value = "corrupt")]
        corrupt: PathBuf,

        /// Where valid files are moved
        #[arg(default_value = "Factsheets-Final")]
        valid: PathBuf,

        /// Only report what would be moved
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Leave valid files in the source directory
        #[arg(long)]
        no_valid: bool,
    },

    /// Extract index details into the indices CSV
    Parse {
        #[arg(long, default_value = "Factsheets")]
        factsheets_dir: PathBuf,

        #[arg(long, default_value = "parsed_data/Indices-Table 1.csv")]
        csv: PathBuf,

        /// Only process `<INDEX>.pdf`
        #[arg(long)]
        index: Option<String>,

        /// Save annotated text and table dumps next to the CSV
        #[arg(short, long)]
        debug: bool,
    },

    /// Extract sector weights into the sector CSV
    Sectors {
        #[arg(long, default_value = "Factsheets")]
        factsheets_dir: PathBuf,

        #[arg(long, default_value = "parsed_data/Sector-Table 1.csv")]
        csv: PathBuf,
    },

    /// Dump extracted text, tables and fields for a single PDF
    Inspect {
        pdf: PathBuf,

        #[arg(short, long, default_value = "./output")]
        output_dir: PathBuf,
    },
}

fn run_validate(source: &Path, corrupt: &Path, valid: Option<&Path>, dry_run: bool) -> Result<(), AppError> {
    if !source.is_dir() {
        return Err(AppError::Config(format!("Source directory not found: {}", source.display())));
    }

    tracing::info!("Scanning {} for corrupted PDFs", source.display());
    if dry_run {
        tracing::info!("DRY RUN MODE: No files will be moved");
    }

    let report = validate::find_and_move_corrupt_pdfs(source, corrupt, valid, dry_run)?;
    for (path, reason) in &report.corrupted {
        tracing::debug!("{}: {}", path.display(), reason);
    }
    tracing::info!("Done: {} valid, {} corrupted", report.valid.len(), report.corrupted.len());
    Ok(())
}

fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::debug!("Starting with args: {:?}", args);

    if args.min_column_gap == 0 {
        return Err(AppError::Config("--min-column-gap must be at least 1".to_string()));
    }
    let settings = TableSettings { min_column_gap: args.min_column_gap };

    let summary = match args.command {
        Command::Validate { source, corrupt, valid, dry_run, no_valid } => {
            let valid = (!no_valid).then_some(valid.as_path());
            return run_validate(&source, &corrupt, valid, dry_run);
        }
        Command::Parse { factsheets_dir, csv, index, debug } => {
            let debug_dir = debug.then(|| csv.parent().unwrap_or(Path::new(".")).join("debug"));
            batch::factsheets::process_factsheets(
                &factsheets_dir,
                &csv,
                index.as_deref(),
                debug_dir.as_deref(),
                &settings,
            )?
        }
        Command::Sectors { factsheets_dir, csv } => batch::sectors::process_sectors(&factsheets_dir, &csv, &settings)?,
        Command::Inspect { pdf, output_dir } => {
            return batch::inspect::inspect_factsheet(&pdf, &output_dir, &settings);
        }
    };

    if summary.processed == 0 && summary.errors > 0 {
        return Err(AppError::Processing(format!("Failed to extract data from any of {} files", summary.errors)));
    }

    Ok(())
}
