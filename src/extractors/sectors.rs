// src/extractors/sectors.rs
use std::collections::BTreeMap;

use crate::pdf::{PdfContent, Table};

/// Sector name to weight (percent sign removed).
pub type SectorWeights = BTreeMap<String, String>;

const IGNORED_SECTORS: [&str; 2] = ["total", "others"];

fn is_sector_header(header: &[String]) -> bool {
    let text = header.join(" ").to_lowercase();
    text.contains("sector") && (text.contains("weight") || text.contains('%'))
}

/// Column indices of the sector name and weight, defaulting to 0 and 1.
fn sector_columns(header: &[String]) -> (usize, usize) {
    let mut sector_col = None;
    let mut weight_col = None;
    for (idx, cell) in header.iter().enumerate() {
        let h = cell.to_lowercase();
        if h.contains("sector") {
            sector_col = Some(idx);
        } else if h.contains("weight") || h.contains('%') {
            weight_col = Some(idx);
        }
    }
    (sector_col.unwrap_or(0), weight_col.unwrap_or(1))
}

fn weights_from_table(table: &Table) -> SectorWeights {
    let (sector_col, weight_col) = sector_columns(&table[0]);
    let mut weights = SectorWeights::new();

    for row in table[1..].iter().filter(|r| r.len() > sector_col.max(weight_col)) {
        let sector = row[sector_col].trim();
        let weight = row[weight_col].replace('%', "");
        let weight = weight.trim();

        if sector.is_empty() || weight.is_empty() || IGNORED_SECTORS.contains(&sector.to_lowercase().as_str()) {
            continue;
        }
        weights.insert(sector.to_string(), weight.to_string());
    }
    weights
}

/// Reads the sector representation table.
///
/// Tables are scanned in page order; the first one with a sector/weight
/// header that yields at least one sector is returned.
pub fn extract_sectors(content: &PdfContent) -> Option<SectorWeights> {
    for table in content.tables.iter().filter(|t| t.len() >= 2) {
        if !is_sector_header(&table[0]) {
            continue;
        }
        let weights = weights_from_table(table);
        if !weights.is_empty() {
            tracing::debug!("Found {} sectors in {}", weights.len(), content.file_name);
            return Some(weights);
        }
    }
    None
}
