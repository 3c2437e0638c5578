// src/utils/text_debug.rs
use std::fs::File;
use std::io::Write;
use std::path::Path;
use crate::pdf::Table;
use crate::utils::error::AppError;

/// Saves extracted text to a file, wrapping each highlighted span in `[[label: ...]]`.
pub fn save_debug_text(text: &str, path: &Path, highlights: &[(usize, usize, &str)]) -> Result<(), AppError> {
    let mut file = File::create(path)?;

    let mut sorted_highlights = highlights.to_vec();
    sorted_highlights.sort_by_key(|h| (h.0, std::cmp::Reverse(h.1)));

    let mut annotated = String::with_capacity(text.len() + highlights.len() * 16);
    let mut last_pos = 0;

    for (start, end, label) in sorted_highlights {
        // Overlapping matches from different patterns: keep the first one only
        if start < last_pos {
            continue;
        }
        annotated.push_str(&text[last_pos..start]);
        annotated.push_str(&format!("[[{}: ", label));
        annotated.push_str(&text[start..end]);
        annotated.push_str("]]");
        last_pos = end;
    }

    if last_pos < text.len() {
        annotated.push_str(&text[last_pos..]);
    }

    file.write_all(annotated.as_bytes())?;

    tracing::info!("Saved debug text to {}", path.display());
    Ok(())
}

/// Creates an annotated dump of the text with every match of `patterns` marked.
pub fn create_debug_text(text: &str, path: &Path, patterns: &[(&str, &str)]) -> Result<(), AppError> {
    use regex::Regex;

    let mut highlights = Vec::new();

    for (pattern, label) in patterns {
        let re = Regex::new(pattern).map_err(|e| {
            AppError::Config(format!("Invalid regex pattern '{}': {}", pattern, e))
        })?;

        for mat in re.find_iter(text) {
            if mat.start() < mat.end() {
                highlights.push((mat.start(), mat.end(), *label));
            }
        }
    }

    save_debug_text(text, path, &highlights)
}

/// Writes the detected tables, one block per table with cells separated by ` | `.
pub fn save_debug_tables(tables: &[Table], path: &Path) -> Result<(), AppError> {
    let mut out = String::new();
    for (idx, table) in tables.iter().enumerate() {
        out.push_str(&format!("## Table {} ({} rows)\n", idx + 1, table.len()));
        for row in table {
            out.push_str(&row.join(" | "));
            out.push('\n');
        }
        out.push('\n');
    }
    std::fs::write(path, out)?;
    tracing::info!("Saved {} detected tables to {}", tables.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_text_marks_matches() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.txt");
        let text = "Index Variant: Nifty 50 Total Returns Index.\nBase Date: Nov 03, 1995";

        create_debug_text(text, &path, &[(r"(?i)index\s+variant", "variant"), (r"(?i)base date", "basic")]).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("[[variant: Index Variant]]"));
        assert!(written.contains("[[basic: Base Date]]"));
        assert!(written.ends_with("Nov 03, 1995"));
    }

    #[test]
    fn test_debug_text_rejects_bad_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.txt");
        let result = create_debug_text("text", &path, &[("(unclosed", "bad")]);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_debug_tables_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tables.txt");
        let tables = vec![vec![
            vec!["Sector".to_string(), "Weight(%)".to_string()],
            vec!["Financial Services".to_string(), "33.1".to_string()],
        ]];
        save_debug_tables(&tables, &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("## Table 1 (2 rows)"));
        assert!(written.contains("Financial Services | 33.1"));
    }
}
