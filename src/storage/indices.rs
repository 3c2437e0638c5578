// src/storage/indices.rs
use std::path::Path;

use crate::extractors::fields::{FactsheetRecord, Field};
use crate::storage::CsvTable;
use crate::utils::error::StorageError;

/// Accumulated `Indices-Table` CSV: one row per parsed factsheet.
#[derive(Debug, Clone)]
pub struct IndicesTable {
    table: CsvTable,
}

impl IndicesTable {
    /// Loads the CSV (or starts a new one) and cleans it up.
    ///
    /// A first row that only repeats header names is dropped, as are rows
    /// with every known column empty. Known columns come first in their
    /// canonical order; any extra columns are kept after them.
    pub fn load(path: &Path) -> Self {
        let known = Field::headers();
        let mut table = CsvTable::load_or_new(path, &known);

        if let Some(first) = table.rows.first() {
            let repeats_header = first.iter().all(|v| v.is_empty() || table.headers.contains(v));
            if repeats_header {
                tracing::debug!("Dropping header-like first row from {}", path.display());
                table.rows.remove(0);
            }
        }

        for name in &known {
            table.ensure_column(name);
        }

        let known_idx: Vec<usize> = known.iter().filter_map(|n| table.column(n)).collect();
        let before = table.rows.len();
        table.rows.retain(|row| known_idx.iter().any(|&i| !row[i].is_empty()));
        if table.rows.len() != before {
            tracing::debug!("Dropped {} empty rows", before - table.rows.len());
        }

        let mut order: Vec<String> = known.iter().map(|s| s.to_string()).collect();
        order.extend(table.headers.iter().filter(|h| !known.contains(&h.as_str())).cloned());
        table.reorder(&order);

        Self { table }
    }

    pub fn len(&self) -> usize {
        self.table.rows.len()
    }

    pub fn contains_filename(&self, filename: &str) -> bool {
        let header = Field::Filename.header();
        !filename.is_empty() && (0..self.table.rows.len()).any(|row| self.table.cell(row, header) == filename)
    }

    /// Appends a record; extra columns stay empty.
    pub fn append(&mut self, record: &FactsheetRecord) {
        let mut row = vec![String::new(); self.table.headers.len()];
        for (field, value) in Field::ALL.iter().zip(record.row()) {
            if let Some(idx) = self.table.column(field.header()) {
                row[idx] = value;
            }
        }
        self.table.rows.push(row);
    }

    pub fn save(&self, path: &Path) -> Result<(), StorageError> {
        self.table.save(path)
    }

    pub fn headers(&self) -> &[String] {
        &self.table.headers
    }
}
