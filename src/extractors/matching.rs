// src/extractors/matching.rs

// Matches index names (as typed in an existing sector CSV) back to factsheet
// file names.

use std::collections::HashSet;
use std::path::Path;

/// Hand-maintained matches for names no heuristic resolves.
const MANUAL_FILENAMES: [(&str, &str); 6] = [
    ("nifty 200", "ind_nifty_200.pdf"),
    ("nifty500 low volatility 50", "Factsheet_Nifty500LowVolatility50.pdf"),
    ("nifty india defence", "Factsheet_NiftyIndiaDefence.pdf"),
    ("nifty midsmallcap 400", "ind_Nifty_MidSmallcap_400.pdf"),
    ("nifty smallcap 250", "ind_nifty_smallcap_250.pdf"),
    ("nifty total market", "Factsheet_NiftyTotalMarket.pdf"),
];

const MIN_COMMON_WORDS: usize = 2;
const MIN_WORD_LEN: usize = 4;

/// Lowercases and collapses whitespace.
pub fn normalize_index_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

fn significant_words(name: &str) -> HashSet<&str> {
    name.split_whitespace().filter(|w| w.chars().count() >= MIN_WORD_LEN).collect()
}

/// Known factsheets keyed by the normalized index name found in each PDF.
#[derive(Debug, Default)]
pub struct FilenameMatcher {
    // Insertion order is kept so fuzzy ties resolve to the earliest PDF.
    known: Vec<(String, String)>,
}

impl FilenameMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a PDF under its index name. A repeated name keeps its
    /// original position but points at the newer file.
    pub fn add(&mut self, index_name: &str, filename: &str) {
        let normalized = normalize_index_name(index_name);
        match self.known.iter_mut().find(|(name, _)| *name == normalized) {
            Some(entry) => entry.1 = filename.to_string(),
            None => self.known.push((normalized, filename.to_string())),
        }
    }

    pub fn len(&self) -> usize {
        self.known.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }

    /// Resolves the factsheet file for an index name.
    ///
    /// Order: manual table (only when the file exists in `factsheets_dir`),
    /// exact normalized name, then the PDF sharing the most significant
    /// words (at least two).
    pub fn find(&self, index_name: &str, factsheets_dir: &Path) -> Option<String> {
        let normalized = normalize_index_name(index_name);

        if let Some((_, filename)) = MANUAL_FILENAMES.iter().find(|(name, _)| *name == normalized) {
            if factsheets_dir.join(filename).exists() {
                return Some(filename.to_string());
            }
        }

        if let Some((_, filename)) = self.known.iter().find(|(name, _)| *name == normalized) {
            return Some(filename.clone());
        }

        let wanted = significant_words(&normalized);
        let mut best: Option<(&str, usize)> = None;
        for (name, filename) in &self.known {
            let score = significant_words(name).intersection(&wanted).count();
            if score >= MIN_COMMON_WORDS && best.map_or(true, |(_, s)| score > s) {
                best = Some((filename.as_str(), score));
            }
        }
        best.map(|(filename, score)| {
            tracing::debug!("Fuzzy matched '{}' to {} ({} common words)", index_name, filename, score);
            filename.to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_index_name("  Nifty   Midcap\t150 "), "nifty midcap 150");
    }

    #[test]
    fn test_manual_mapping_requires_file() {
        let dir = tempfile::tempdir().unwrap();
        let matcher = FilenameMatcher::new();
        assert_eq!(matcher.find("Nifty 200", dir.path()), None);

        std::fs::write(dir.path().join("ind_nifty_200.pdf"), b"%PDF").unwrap();
        assert_eq!(matcher.find("NIFTY  200", dir.path()).as_deref(), Some("ind_nifty_200.pdf"));
    }

    #[test]
    fn test_exact_match() {
        let dir = tempfile::tempdir().unwrap();
        let mut matcher = FilenameMatcher::new();
        matcher.add("Nifty Alpha 50", "ind_nifty_alpha_50.pdf");
        assert_eq!(matcher.find("nifty alpha 50", dir.path()).as_deref(), Some("ind_nifty_alpha_50.pdf"));
    }

    #[test]
    fn test_fuzzy_match_prefers_more_common_words() {
        let dir = tempfile::tempdir().unwrap();
        let mut matcher = FilenameMatcher::new();
        matcher.add("Nifty Midcap 150", "ind_midcap150.pdf");
        matcher.add("Nifty Midcap150 Momentum 50", "ind_midcap150_momentum.pdf");
        matcher.add("Nifty Midcap Momentum Quality", "ind_mq.pdf");

        assert_eq!(
            matcher.find("Nifty Midcap Momentum Quality 100", dir.path()).as_deref(),
            Some("ind_mq.pdf")
        );
        // Only one significant word in common
        assert_eq!(matcher.find("Nifty Bank", dir.path()), None);
    }

    #[test]
    fn test_fuzzy_tie_keeps_earliest() {
        let dir = tempfile::tempdir().unwrap();
        let mut matcher = FilenameMatcher::new();
        matcher.add("Nifty Smallcap Quality", "a.pdf");
        matcher.add("Nifty Smallcap Value", "b.pdf");
        assert_eq!(matcher.find("Nifty Smallcap Growth", dir.path()).as_deref(), Some("a.pdf"));
    }

    #[test]
    fn test_repeated_name_points_at_newer_file() {
        let mut matcher = FilenameMatcher::new();
        matcher.add("Nifty 50", "old.pdf");
        matcher.add("nifty 50", "new.pdf");
        assert_eq!(matcher.len(), 1);
        assert_eq!(matcher.find("Nifty 50", Path::new("/nonexistent")).as_deref(), Some("new.pdf"));
    }
}
