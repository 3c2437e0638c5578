// src/validate/mod.rs

// Downloaded "PDFs" are sometimes HTML error pages saved under a .pdf name.
// This module sorts them out before any parsing happens.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::pdf;
use crate::utils::error::PdfError;

const PDF_MAGIC: &[u8; 4] = b"%PDF";
const ERROR_MESSAGE_LIMIT: usize = 50;

/// Outcome of checking one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfStatus {
    Valid,
    Corrupt(String),
}

/// Files classified by a scan.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub valid: Vec<PathBuf>,
    pub corrupted: Vec<(PathBuf, String)>,
}

/// Checks the `%PDF` magic bytes, then that the document parses and has pages.
pub fn check_pdf_validity(path: &Path) -> PdfStatus {
    let mut header = Vec::with_capacity(PDF_MAGIC.len());
    let read = fs::File::open(path).and_then(|f| f.take(PDF_MAGIC.len() as u64).read_to_end(&mut header));
    if let Err(e) = read {
        return PdfStatus::Corrupt(truncate_error(&e.to_string()));
    }
    if header.as_slice() != PDF_MAGIC {
        return PdfStatus::Corrupt(format!("Not a PDF (header: {:?})", String::from_utf8_lossy(&header)));
    }

    match pdf::page_count(path) {
        Ok(0) => PdfStatus::Corrupt("Empty PDF".to_string()),
        Ok(_) => PdfStatus::Valid,
        Err(PdfError::Structure(msg)) => PdfStatus::Corrupt(truncate_error(&msg)),
        Err(e) => PdfStatus::Corrupt(truncate_error(&e.to_string())),
    }
}

fn truncate_error(msg: &str) -> String {
    format!("Error - {}", msg.chars().take(ERROR_MESSAGE_LIMIT).collect::<String>())
}

fn move_all(files: &[PathBuf], dest_dir: &Path, dry_run: bool) -> Result<(), PdfError> {
    for file in files {
        let name = pdf::file_name_of(file);
        if dry_run {
            tracing::info!("  Would move: {}", name);
            continue;
        }
        fs::rename(file, dest_dir.join(&name))?;
        tracing::info!("  Moved: {} -> {}", name, dest_dir.display());
    }
    Ok(())
}

/// Classifies every PDF in `source_dir` and moves files accordingly.
///
/// Corrupt files go to `corrupt_dir`; valid files go to `valid_dir` when
/// one is given and otherwise stay put. Target directories are created even
/// in dry-run mode, which only reports what would move.
pub fn find_and_move_corrupt_pdfs(
    source_dir: &Path,
    corrupt_dir: &Path,
    valid_dir: Option<&Path>,
    dry_run: bool,
) -> Result<ScanReport, PdfError> {
    fs::create_dir_all(corrupt_dir)?;
    if let Some(dir) = valid_dir {
        fs::create_dir_all(dir)?;
    }

    let pdf_files = pdf::list_pdfs(source_dir)?;
    if pdf_files.is_empty() {
        tracing::warn!("No PDF files found in {}", source_dir.display());
        return Ok(ScanReport::default());
    }
    tracing::info!("Found {} PDF files to check", pdf_files.len());

    let mut report = ScanReport::default();
    for path in pdf_files {
        match check_pdf_validity(&path) {
            PdfStatus::Valid => {
                tracing::info!("{}: Valid PDF", pdf::file_name_of(&path));
                report.valid.push(path);
            }
            PdfStatus::Corrupt(reason) => {
                tracing::warn!("{}: {}", pdf::file_name_of(&path), reason);
                report.corrupted.push((path, reason));
            }
        }
    }
    tracing::info!("Summary: {} valid, {} corrupted", report.valid.len(), report.corrupted.len());

    let prefix = if dry_run { "[DRY RUN] Would move" } else { "Moving" };

    if let Some(dir) = valid_dir.filter(|_| !report.valid.is_empty()) {
        tracing::info!("{} {} valid files to {}", prefix, report.valid.len(), dir.display());
        move_all(&report.valid, dir, dry_run)?;
    }

    if report.corrupted.is_empty() {
        tracing::info!("No corrupted files found!");
    } else {
        tracing::info!("{} {} corrupted files to {}", prefix, report.corrupted.len(), corrupt_dir.display());
        let corrupted: Vec<PathBuf> = report.corrupted.iter().map(|(p, _)| p.clone()).collect();
        move_all(&corrupted, corrupt_dir, dry_run)?;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HTML_PAGE: &[u8] = b"<!DOCTYPE html><html><body>403 Forbidden</body></html>";

    /// Writes a minimal PDF with `pages` blank A4 pages.
    fn write_pdf(path: &Path, pages: usize) {
        use lopdf::{dictionary, Document, Object};

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let kids: Vec<Object> = (0..pages)
            .map(|_| {
                doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
                })
                .into()
            })
            .collect();
        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }

    #[test]
    fn test_one_page_pdf_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ind_nifty50.pdf");
        write_pdf(&path, 1);
        assert_eq!(check_pdf_validity(&path), PdfStatus::Valid);
    }

    #[test]
    fn test_zero_page_pdf_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.pdf");
        write_pdf(&path, 0);
        assert_eq!(check_pdf_validity(&path), PdfStatus::Corrupt("Empty PDF".to_string()));
    }

    #[test]
    fn test_valid_files_are_moved_to_valid_dir() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("Factsheets");
        let corrupt = dir.path().join("corrupt");
        let valid = dir.path().join("Factsheets-Final");
        fs::create_dir(&source).unwrap();
        write_pdf(&source.join("ind_nifty50.pdf"), 2);
        fs::write(source.join("bad.pdf"), HTML_PAGE).unwrap();

        let report = find_and_move_corrupt_pdfs(&source, &corrupt, Some(valid.as_path()), false).unwrap();
        assert_eq!(report.valid, vec![source.join("ind_nifty50.pdf")]);
        assert_eq!(report.corrupted.len(), 1);
        assert!(valid.join("ind_nifty50.pdf").exists());
        assert!(!source.join("ind_nifty50.pdf").exists());
        assert!(corrupt.join("bad.pdf").exists());
    }

    #[test]
    fn test_valid_files_stay_without_valid_dir() {
        let dir = tempfile::tempdir().unwrap();
        let corrupt = dir.path().join("corrupt");
        write_pdf(&dir.path().join("ind_nifty50.pdf"), 1);

        let report = find_and_move_corrupt_pdfs(dir.path(), &corrupt, None, false).unwrap();
        assert_eq!(report.valid.len(), 1);
        assert!(dir.path().join("ind_nifty50.pdf").exists());
    }

    #[test]
    fn test_html_is_not_a_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ind_nifty50.pdf");
        fs::write(&path, HTML_PAGE).unwrap();

        match check_pdf_validity(&path) {
            PdfStatus::Corrupt(reason) => assert!(reason.starts_with("Not a PDF"), "{}", reason),
            PdfStatus::Valid => panic!("HTML accepted as PDF"),
        }
    }

    #[test]
    fn test_truncated_pdf_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        fs::write(&path, b"%PDF-1.7\n%garbage with no objects").unwrap();

        let status = check_pdf_validity(&path);
        assert_ne!(status, PdfStatus::Valid);
        if let PdfStatus::Corrupt(reason) = status {
            assert!(reason.starts_with("Error - ") || reason == "Empty PDF", "{}", reason);
            assert!(reason.chars().count() <= "Error - ".len() + ERROR_MESSAGE_LIMIT);
        }
    }

    #[test]
    fn test_missing_file_is_corrupt() {
        assert_ne!(check_pdf_validity(Path::new("/nonexistent/file.pdf")), PdfStatus::Valid);
    }

    #[test]
    fn test_dry_run_moves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("Factsheets");
        let corrupt = dir.path().join("corrupt");
        fs::create_dir(&source).unwrap();
        fs::write(source.join("bad.pdf"), HTML_PAGE).unwrap();

        let report = find_and_move_corrupt_pdfs(&source, &corrupt, None, true).unwrap();
        assert_eq!(report.corrupted.len(), 1);
        assert!(report.valid.is_empty());
        assert!(source.join("bad.pdf").exists());
        assert!(corrupt.is_dir());
    }

    #[test]
    fn test_corrupt_files_are_moved() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("Factsheets");
        let corrupt = dir.path().join("corrupt");
        let valid = dir.path().join("Factsheets-Final");
        fs::create_dir(&source).unwrap();
        fs::write(source.join("a.pdf"), HTML_PAGE).unwrap();
        fs::write(source.join("b.pdf"), b"").unwrap();
        fs::write(source.join("notes.txt"), b"ignored").unwrap();

        let report = find_and_move_corrupt_pdfs(&source, &corrupt, Some(valid.as_path()), false).unwrap();
        assert_eq!(report.corrupted.len(), 2);
        assert!(corrupt.join("a.pdf").exists());
        assert!(corrupt.join("b.pdf").exists());
        assert!(!source.join("a.pdf").exists());
        assert!(source.join("notes.txt").exists());
        assert!(valid.is_dir());
    }

    #[test]
    fn test_empty_source() {
        let dir = tempfile::tempdir().unwrap();
        let report = find_and_move_corrupt_pdfs(dir.path(), &dir.path().join("corrupt"), None, false).unwrap();
        assert!(report.valid.is_empty() && report.corrupted.is_empty());
    }
}
