// src/storage/mod.rs
pub mod indices;
pub mod sectors;

use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, Writer};

use crate::utils::error::StorageError;
pub use indices::IndicesTable;
pub use sectors::SectorTable;

/// An in-memory CSV: one header row plus data rows of equal length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn with_headers<S: AsRef<str>>(headers: &[S]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.as_ref().to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Reads a CSV file. Short rows are padded and long rows truncated to
    /// the header width.
    pub fn load(path: &Path) -> Result<Self, StorageError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)?;

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let width = headers.len();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(width, String::new());
            rows.push(row);
        }

        tracing::debug!("Loaded {} rows ({} columns) from {}", rows.len(), width, path.display());
        Ok(Self { headers, rows })
    }

    /// Loads `path` when it exists, otherwise starts an empty table. An
    /// unreadable file is logged and replaced by an empty table.
    pub fn load_or_new<S: AsRef<str>>(path: &Path, headers: &[S]) -> Self {
        if !path.exists() {
            return Self::with_headers(headers);
        }
        match Self::load(path) {
            Ok(table) => table,
            Err(e) => {
                tracing::warn!("Could not read existing CSV {}: {}. Creating new CSV.", path.display(), e);
                Self::with_headers(headers)
            }
        }
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Adds an empty column when missing and returns its index.
    pub fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(idx) = self.column(name) {
            return idx;
        }
        self.headers.push(name.to_string());
        for row in &mut self.rows {
            row.push(String::new());
        }
        self.headers.len() - 1
    }

    /// Removes every column whose header matches `drop`.
    pub fn drop_columns(&mut self, drop: impl Fn(&str) -> bool) {
        let keep: Vec<usize> = (0..self.headers.len()).filter(|&i| !drop(&self.headers[i])).collect();
        self.select(&keep);
    }

    /// Rearranges columns to `order`; names not present are ignored and
    /// columns not named are dropped.
    pub fn reorder<S: AsRef<str>>(&mut self, order: &[S]) {
        let indices: Vec<usize> = order.iter().filter_map(|name| self.column(name.as_ref())).collect();
        self.select(&indices);
    }

    fn select(&mut self, indices: &[usize]) {
        self.headers = indices.iter().map(|&i| self.headers[i].clone()).collect();
        for row in &mut self.rows {
            *row = indices.iter().map(|&i| row[i].clone()).collect();
        }
    }

    /// Value at `row`/`column name`, empty when the column is missing.
    pub fn cell(&self, row: usize, name: &str) -> &str {
        self.column(name)
            .and_then(|c| self.rows.get(row).and_then(|r| r.get(c)))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Writes the table, creating parent directories first.
    pub fn save(&self, path: &Path) -> Result<(), StorageError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut writer = Writer::from_path(path)?;
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;

        tracing::info!("Saved {} rows to {}", self.rows.len(), path.display());
        Ok(())
    }
}
