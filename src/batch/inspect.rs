// src/batch/inspect.rs
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::extractors::{extract_sectors, parse_factsheet, FactsheetRecord, SectorWeights};
use crate::pdf::{PdfContent, TableSettings};
use crate::utils::error::{AppError, StorageError};
use crate::utils::text_debug;

// Patterns highlighted in the annotated text dump.
const DEBUG_PATTERNS: [(&str, &str); 8] = [
    (r"(?i)Index\s+Variant:[^\n]*", "variant"),
    (r"(?i)\bThe\s+Nifty[^\n]{0,80}?\s+Index\b", "name"),
    (r"(?i)\b(?:index\s+)?methodology\b", "basic"),
    (r"(?i)\b(?:no\.\s+of\s+|number\s+of\s+)?constituents\b", "basic"),
    (r"(?i)\b(?:launch|base)\s+(?:date|value)\b", "basic"),
    (r"(?i)\b(?:price|total)\s+return\b", "returns"),
    (r"(?i)\b(?:std\.?\s+deviation|beta)\b", "stats"),
    (r"(?i)\bsector\b", "sector"),
];

/// Writes the annotated text and detected tables for one factsheet into
/// `debug_dir`. Returns the paths written.
pub fn write_debug_artifacts(content: &PdfContent, debug_dir: &Path) -> Result<Vec<PathBuf>, AppError> {
    fs::create_dir_all(debug_dir)?;
    let stem = Path::new(&content.file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| content.file_name.clone());

    let text_path = debug_dir.join(format!("{}_annotated.txt", stem));
    text_debug::create_debug_text(&content.text(), &text_path, &DEBUG_PATTERNS)?;

    let tables_path = debug_dir.join(format!("{}_tables.txt", stem));
    text_debug::save_debug_tables(&content.tables, &tables_path)?;

    Ok(vec![text_path, tables_path])
}

#[derive(Debug, Serialize)]
struct FactsheetMetadata<'a> {
    file_name: &'a str,
    page_count: usize,
    table_count: usize,
    record: Option<BTreeMap<&'static str, &'a str>>,
    filled_fields: usize,
    sectors: Option<SectorWeights>,
    extraction_timestamp: String,
}

/// Writes a JSON summary of what was extracted from one factsheet.
pub fn save_metadata(content: &PdfContent, record: Option<&FactsheetRecord>, path: &Path) -> Result<(), AppError> {
    let metadata = FactsheetMetadata {
        file_name: &content.file_name,
        page_count: content.pages.len(),
        table_count: content.tables.len(),
        record: record.map(|r| r.to_named_map()),
        filled_fields: record.map_or(0, |r| r.filled_count()),
        sectors: extract_sectors(content),
        extraction_timestamp: chrono::Utc::now().to_rfc3339(),
    };

    let metadata_str = serde_json::to_string_pretty(&metadata)
        .map_err(|e| StorageError::SerializationError(e.to_string()))?;
    fs::write(path, metadata_str)?;

    tracing::info!("Saved metadata to {}", path.display());
    Ok(())
}

/// Dumps everything the extractors see and find for a single PDF.
pub fn inspect_factsheet(pdf_path: &Path, output_dir: &Path, settings: &TableSettings) -> Result<(), AppError> {
    let content = PdfContent::load(pdf_path, settings)?;
    tracing::info!(
        "Loaded {}: {} pages, {} tables",
        content.file_name,
        content.pages.len(),
        content.tables.len()
    );

    let written = write_debug_artifacts(&content, output_dir)?;
    for path in &written {
        tracing::info!("Wrote {}", path.display());
    }

    let record = match parse_factsheet(&content) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::warn!("{}", e);
            None
        }
    };

    let stem = pdf_path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    save_metadata(&content, record.as_ref(), &output_dir.join(format!("{}_meta.json", stem)))
}
