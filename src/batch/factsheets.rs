// src/batch/factsheets.rs
use std::path::Path;

use crate::batch::inspect::write_debug_artifacts;
use crate::batch::RunSummary;
use crate::extractors::{parse_factsheet, FactsheetRecord, Field};
use crate::pdf::{self, PdfContent, TableSettings};
use crate::storage::IndicesTable;
use crate::utils::AppError;

fn parse_one(path: &Path, debug_dir: Option<&Path>, settings: &TableSettings) -> Result<FactsheetRecord, AppError> {
    let content = PdfContent::load(path, settings)?;

    if let Some(dir) = debug_dir {
        match write_debug_artifacts(&content, dir) {
            Ok(_) => tracing::info!("  Wrote debug dumps to {}", dir.display()),
            Err(e) => tracing::warn!("  Failed to write debug dumps: {}", e),
        }
    }

    Ok(parse_factsheet(&content)?)
}

/// Parses every factsheet in `factsheets_dir` (or only `<index>.pdf`) and
/// appends new rows to the indices CSV.
///
/// Files whose name is already in the CSV are skipped without being read.
/// The CSV is only rewritten when at least one row was added.
pub fn process_factsheets(
    factsheets_dir: &Path,
    csv_path: &Path,
    index: Option<&str>,
    debug_dir: Option<&Path>,
    settings: &TableSettings,
) -> Result<RunSummary, AppError> {
    let mut table = IndicesTable::load(csv_path);
    tracing::debug!("Indices table: {} rows, {} columns", table.len(), table.headers().len());

    let pdf_files = match index {
        Some(stem) => pdf::find_pdf(factsheets_dir, stem).into_iter().collect(),
        None => pdf::list_pdfs(factsheets_dir)?,
    };

    let mut summary = RunSummary::default();
    if pdf_files.is_empty() {
        tracing::warn!("No PDF files found in {}", factsheets_dir.display());
        return Ok(summary);
    }
    tracing::info!("Found {} PDF file(s) to process.", pdf_files.len());

    for path in pdf_files {
        let filename = pdf::file_name_of(&path);
        tracing::info!("Processing: {}...", filename);

        if table.contains_filename(&filename) {
            tracing::info!("  Already exists in CSV (filename: {}), skipping...", filename);
            summary.skipped += 1;
            continue;
        }

        match parse_one(&path, debug_dir, settings) {
            Ok(record) => {
                tracing::info!(
                    "  Extracted data for {} ({} fields)",
                    record.get(Field::IndicesName),
                    record.filled_count()
                );
                table.append(&record);
                summary.processed += 1;
            }
            Err(e) => {
                tracing::error!("  Error processing {}: {}", filename, e);
                summary.errors += 1;
            }
        }
    }

    if summary.processed > 0 {
        table.save(csv_path)?;
        tracing::info!("Saved {} record(s) to {} ({} total)", summary.processed, csv_path.display(), table.len());
    }

    summary.log();
    Ok(summary)
}
