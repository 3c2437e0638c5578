// src/batch/sectors.rs
use std::path::Path;

use crate::batch::RunSummary;
use crate::extractors::{extract_index_name, extract_sectors, FilenameMatcher};
use crate::pdf::{self, PdfContent, TableSettings};
use crate::storage::SectorTable;
use crate::utils::error::{ExtractError, PdfError};
use crate::utils::AppError;

/// Index name of every readable factsheet in `factsheets_dir`.
fn build_matcher(factsheets_dir: &Path, settings: &TableSettings) -> Result<FilenameMatcher, PdfError> {
    let pdf_files = pdf::list_pdfs(factsheets_dir)?;
    tracing::info!("  Extracting index names from {} PDF files...", pdf_files.len());

    let mut matcher = FilenameMatcher::new();
    for path in pdf_files {
        let content = match PdfContent::load(&path, settings) {
            Ok(content) if !content.is_empty() => content,
            Ok(_) => continue,
            Err(e) => {
                tracing::debug!("  Skipping {}: {}", path.display(), e);
                continue;
            }
        };
        let index_name = extract_index_name(&content.text(), &content.file_name);
        matcher.add(&index_name, &content.file_name);
    }
    Ok(matcher)
}

/// Fills in missing `Filename` cells of existing rows. Returns the number
/// of rows matched.
pub fn backfill_sector_filenames(
    table: &mut SectorTable,
    factsheets_dir: &Path,
    settings: &TableSettings,
) -> Result<usize, PdfError> {
    if !table.has_filename_column() || table.rows_missing_filename() == 0 {
        return Ok(0);
    }

    let matcher = build_matcher(factsheets_dir, settings)?;
    if matcher.is_empty() {
        tracing::debug!("  No index names could be read from {}", factsheets_dir.display());
    }

    let matched = table.backfill_filenames(|name| matcher.find(name, factsheets_dir));
    if matched > 0 {
        tracing::info!("  Matched {} rows to PDF files ({} known indices)", matched, matcher.len());
    }
    Ok(matched)
}

/// Extracts sector weights from every factsheet and appends new rows to the
/// sector CSV. The CSV is only rewritten when at least one row was added.
pub fn process_sectors(factsheets_dir: &Path, csv_path: &Path, settings: &TableSettings) -> Result<RunSummary, AppError> {
    let mut table = SectorTable::load(csv_path);
    tracing::info!("Loaded {} existing sector rows from {}", table.len(), csv_path.display());

    if !table.is_empty() {
        tracing::info!("Checking for missing filenames in existing rows...");
        backfill_sector_filenames(&mut table, factsheets_dir, settings)?;
    }

    let mut summary = RunSummary::default();
    let pdf_files = pdf::list_pdfs(factsheets_dir)?;
    if pdf_files.is_empty() {
        tracing::warn!("No PDF files found in {}", factsheets_dir.display());
        return Ok(summary);
    }
    tracing::info!("Found {} PDF file(s) to process.", pdf_files.len());

    for path in pdf_files {
        let filename = pdf::file_name_of(&path);
        tracing::info!("Processing: {}...", filename);

        let content = match PdfContent::load(&path, settings) {
            Ok(content) => content,
            Err(e) => {
                tracing::error!("  Error processing {}: {}", filename, e);
                summary.errors += 1;
                continue;
            }
        };

        let index_name = extract_index_name(&content.text(), &filename);
        if table.contains(&filename, &index_name) {
            tracing::info!("  Already exists in CSV ({} / {}), skipping...", filename, index_name);
            summary.skipped += 1;
            continue;
        }

        match extract_sectors(&content) {
            Some(weights) => {
                tracing::info!("  Extracted {} sectors for {}", weights.len(), index_name);
                table.append(&index_name, &filename, &weights);
                summary.processed += 1;
            }
            None => {
                tracing::error!("  {}", ExtractError::NoSectors(filename));
                summary.errors += 1;
            }
        }
    }

    if summary.processed > 0 {
        table.save(csv_path)?;
        tracing::info!("Saved {} record(s) to {}", summary.processed, csv_path.display());
        tracing::info!("  Total unique sectors: {}", table.sectors().len());
    }

    summary.log();
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const NOT_A_PDF: &[u8] = b"<html>Access Denied</html>";

    #[test]
    fn test_backfill_uses_manual_mapping() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ind_nifty_200.pdf"), NOT_A_PDF).unwrap();

        let csv_path = dir.path().join("Sector-Table 1.csv");
        fs::write(&csv_path, "Indices,Filename,IT\nNifty 200,,11.5\nNifty Fancy Theme,,2.0\n").unwrap();

        let mut table = SectorTable::load(&csv_path);
        let matched = backfill_sector_filenames(&mut table, dir.path(), &TableSettings::default()).unwrap();
        assert_eq!(matched, 1);
        assert_eq!(table.rows_missing_filename(), 1);
        assert!(table.contains("ind_nifty_200.pdf", ""));
    }

    #[test]
    fn test_backfill_skipped_without_filename_column() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("Sector-Table 1.csv");
        fs::write(&csv_path, "Indices,IT\nNifty 200,11.5\n").unwrap();

        let mut table = SectorTable::load(&csv_path);
        // Directory does not exist; it must not be read at all.
        let matched = backfill_sector_filenames(&mut table, &dir.path().join("missing"), &TableSettings::default());
        assert_eq!(matched.unwrap(), 0);
    }

    #[test]
    fn test_unreadable_files_count_as_errors() {
        let dir = tempfile::tempdir().unwrap();
        let factsheets = dir.path().join("Factsheets");
        fs::create_dir(&factsheets).unwrap();
        fs::write(factsheets.join("ind_nifty50.pdf"), NOT_A_PDF).unwrap();
        let csv_path = dir.path().join("parsed_data").join("Sector-Table 1.csv");

        let summary = process_sectors(&factsheets, &csv_path, &TableSettings::default()).unwrap();
        assert_eq!(summary, RunSummary { processed: 0, skipped: 0, errors: 1 });
        assert!(!csv_path.exists());
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let summary = process_sectors(dir.path(), &dir.path().join("s.csv"), &TableSettings::default()).unwrap();
        assert_eq!(summary, RunSummary::default());
    }
}
