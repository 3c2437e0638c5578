// src/pdf/mod.rs
pub mod table;

use std::fs;
use std::path::{Path, PathBuf};

use crate::utils::error::PdfError;
pub use table::{detect_tables, Table, TableSettings};

/// Text and table grids pulled out of one factsheet PDF.
#[derive(Debug, Clone, Default)]
pub struct PdfContent {
    pub file_name: String,
    pub pages: Vec<String>,
    pub tables: Vec<Table>,
}

impl PdfContent {
    /// Loads a PDF from disk and extracts per-page text and tables.
    pub fn load(path: &Path, settings: &TableSettings) -> Result<Self, PdfError> {
        let file_name = file_name_of(path);
        let bytes = fs::read(path)?;

        let pages = pdf_extract::extract_text_from_mem_by_pages(&bytes).map_err(|e| {
            PdfError::TextExtraction { file: file_name.clone(), reason: e.to_string() }
        })?;
        tracing::debug!("Extracted {} pages of text from {}", pages.len(), file_name);

        Ok(Self::from_pages(file_name, pages, settings))
    }

    /// Builds content from already extracted page texts.
    pub fn from_pages(file_name: impl Into<String>, pages: Vec<String>, settings: &TableSettings) -> Self {
        let tables = pages
            .iter()
            .flat_map(|page| detect_tables(page, settings))
            .collect();
        Self { file_name: file_name.into(), pages, tables }
    }

    /// All page texts joined, each non-empty page followed by a newline.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for page in self.pages.iter().filter(|p| !p.is_empty()) {
            text.push_str(page);
            text.push('\n');
        }
        text
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.pages.iter().all(|p| p.trim().is_empty())
    }
}

/// Number of pages according to the PDF object structure.
pub fn page_count(path: &Path) -> Result<usize, PdfError> {
    let doc = lopdf::Document::load(path).map_err(|e| PdfError::Structure(e.to_string()))?;
    Ok(doc.get_pages().len())
}

/// Lists `*.pdf` files directly inside `dir`, sorted by path.
pub fn list_pdfs(dir: &Path) -> Result<Vec<PathBuf>, PdfError> {
    let mut pdfs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "pdf") {
            pdfs.push(path);
        }
    }
    pdfs.sort();
    Ok(pdfs)
}

/// Looks up `<stem>.pdf` inside `dir`.
pub fn find_pdf(dir: &Path, stem: &str) -> Option<PathBuf> {
    let candidate = dir.join(format!("{}.pdf", stem));
    candidate.is_file().then_some(candidate)
}

pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
