// src/storage/sectors.rs
use std::path::Path;

use crate::extractors::sectors::SectorWeights;
use crate::storage::CsvTable;
use crate::utils::error::StorageError;

pub const INDICES_COLUMN: &str = "Indices";
pub const FILENAME_COLUMN: &str = "Filename";

/// Accumulated `Sector-Table` CSV: indices as rows, sectors as columns.
#[derive(Debug, Clone)]
pub struct SectorTable {
    table: CsvTable,
}

impl SectorTable {
    /// Loads the CSV (or starts a new one with only an `Indices` column).
    ///
    /// Leftover `Unnamed*` index columns are dropped, sector names trimmed and
    /// rows without an index name removed.
    pub fn load(path: &Path) -> Self {
        let mut table = CsvTable::load_or_new(path, &[INDICES_COLUMN]);

        if table.column(INDICES_COLUMN).is_none() {
            tracing::warn!("{} has no '{}' column. Creating new CSV.", path.display(), INDICES_COLUMN);
            table = CsvTable::with_headers(&[INDICES_COLUMN]);
        }

        table.drop_columns(|h| h.starts_with("Unnamed"));
        for header in table.headers.iter_mut().filter(|h| h.as_str() != INDICES_COLUMN) {
            *header = header.trim().to_string();
        }

        if let Some(col) = table.column(INDICES_COLUMN) {
            table.rows.retain(|row| !row[col].trim().is_empty());
        }

        tracing::debug!("Sector table has {} rows and {} sectors", table.rows.len(), Self::sectors_of(&table).len());
        Self { table }
    }

    fn sectors_of(table: &CsvTable) -> Vec<&str> {
        table
            .headers
            .iter()
            .map(String::as_str)
            .filter(|h| *h != INDICES_COLUMN && *h != FILENAME_COLUMN)
            .collect()
    }

    /// Sector columns currently in the table.
    pub fn sectors(&self) -> Vec<&str> {
        Self::sectors_of(&self.table)
    }

    pub fn len(&self) -> usize {
        self.table.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.rows.is_empty()
    }

    pub fn has_filename_column(&self) -> bool {
        self.table.column(FILENAME_COLUMN).is_some()
    }

    /// Fills empty `Filename` cells using `resolve(index_name)`.
    ///
    /// Does nothing until the table has a `Filename` column. Returns the
    /// number of rows updated.
    pub fn backfill_filenames(&mut self, resolve: impl Fn(&str) -> Option<String>) -> usize {
        let (Some(name_col), Some(file_col)) = (self.table.column(INDICES_COLUMN), self.table.column(FILENAME_COLUMN)) else {
            return 0;
        };

        let mut matched = 0;
        for row in self.table.rows.iter_mut().filter(|r| r[file_col].is_empty()) {
            if let Some(filename) = resolve(&row[name_col]) {
                tracing::debug!("Backfilled '{}' -> {}", row[name_col], filename);
                row[file_col] = filename;
                matched += 1;
            }
        }
        matched
    }

    /// Number of rows that still lack a filename.
    pub fn rows_missing_filename(&self) -> usize {
        match self.table.column(FILENAME_COLUMN) {
            Some(col) => self.table.rows.iter().filter(|r| r[col].is_empty()).count(),
            None => 0,
        }
    }

    /// Whether a factsheet is already present.
    ///
    /// Matches on filename when the table tracks filenames; otherwise an
    /// existing index name containing `index_name` (case-insensitive)
    /// counts as present.
    pub fn contains(&self, filename: &str, index_name: &str) -> bool {
        if let Some(col) = self.table.column(FILENAME_COLUMN) {
            return self.table.rows.iter().any(|r| r[col] == filename);
        }
        let Some(col) = self.table.column(INDICES_COLUMN) else { return false };
        let needle = index_name.to_lowercase();
        self.table.rows.iter().any(|r| r[col].to_lowercase().contains(&needle))
    }

    /// Appends a row, adding columns for sectors seen for the first time.
    pub fn append(&mut self, index_name: &str, filename: &str, weights: &SectorWeights) {
        let name_col = self.table.ensure_column(INDICES_COLUMN);
        let file_col = self.table.ensure_column(FILENAME_COLUMN);
        for sector in weights.keys() {
            self.table.ensure_column(sector);
        }

        let mut row = vec![String::new(); self.table.headers.len()];
        row[name_col] = index_name.to_string();
        row[file_col] = filename.to_string();
        for (sector, weight) in weights {
            if let Some(idx) = self.table.column(sector) {
                row[idx] = weight.clone();
            }
        }
        self.table.rows.push(row);
    }

    /// Writes `Indices`, `Filename`, then sector columns alphabetically.
    pub fn save(&mut self, path: &Path) -> Result<(), StorageError> {
        self.table.ensure_column(FILENAME_COLUMN);

        let mut sectors: Vec<String> = self.sectors().into_iter().map(str::to_string).collect();
        sectors.sort();
        let mut order = vec![INDICES_COLUMN.to_string(), FILENAME_COLUMN.to_string()];
        order.extend(sectors);
        self.table.reorder(&order);

        self.table.save(path)
    }
}
