// src/extractors/index_name.rs

// --- Imports ---
use once_cell::sync::Lazy;
use regex::Regex;

fn compile_all(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|pat| match Regex::new(pat) {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::error!("Skipping invalid index name pattern {}: {}", pat, e);
                None
            }
        })
        .collect()
}

// --- Regex Patterns (Lazy Static) ---
// "Index Variant: Nifty500 Multicap Momentum Quality 50 Total Returns Index."
static INDEX_VARIANT_RE: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile_all(&[
        r"(?i)Index\s+Variant:\s*([Nn]ifty[^\n]{0,100}?)(?:\s+Total\s+Returns\s+Index|Total\s+Returns|Index)",
        r"(?i)Index\s+Variant:\s*([Nn]ifty[^\n]{0,100}?)(?:\.|\n?\z)",
    ])
});

// Order matters: more specific patterns first.
static INDEX_NAME_RE: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile_all(&[
        // 'Name' Index, straight or curly quotes
        r#"(?i)[\x{2018}\x{2019}\x{201C}\x{201D}"']([Nn]ifty[^\x{2018}\x{2019}\x{201C}\x{201D}"']{0,60}?)[\x{2018}\x{2019}\x{201C}\x{201D}"']\s+Index"#,
        // The Name index includes/which/is ...
        r"(?i)The\s+([Nn]ifty[^\s]+(?:\s+[A-Za-z0-9\-]+){0,10})\s+index\s+(?:includes|which|is|aims|represents)",
        // Low-Volatility variants
        r"(?i)([Nn]ifty\s+(?:Alpha\s+)?(?:Quality\s+)?(?:Value\s+)?Low-Volatility\s+30)\s+Index\s+(?:is|which|aims)",
        r"(?i)([Nn]ifty[^\s]+(?:\s+[A-Za-z0-9\-]+){0,10})\s+index\s+aims",
        r"(?i)The\s+([Nn]ifty\s+(?:LargeMidcap|Midcap|Microcap|Smallcap|Alpha|Healthcare|High\s+Beta|Low\s+Volatility|Quality|50\s+Arbitrage)[^\n]{0,50}?)(?:\s+Index|\s+Total\s+Returns|\s+reflects)",
        r"(?i)The\s+([Nn]ifty[^\n]{0,80}?)(?:\s+Index|\s+Total\s+Returns|\s+reflects)",
        r"(?i)([Nn]ifty\s+[A-Za-z0-9\s\-]{0,50}?)\s+Index",
        r"(?i)([Nn]ifty\s+Next\s+50)",
        r"(?i)([Nn]ifty\s+50)",
    ])
});

static TRAILING_TRI_INDEX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+Total\s+Returns\s+Index\.?\s*$").expect("valid regex"));
static TRAILING_TRI_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+Total\s+Returns\.?\s*$").expect("valid regex"));
static TRAILING_INDEX_DOT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+Index\.?\s*$").expect("valid regex"));
static TRAILING_INDEX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+Index\s*$").expect("valid regex"));

static FILE_IND_PREFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^ind_").expect("valid regex"));
static FILE_FACTSHEET_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^factsheet_").expect("valid regex"));
static DIGIT_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)").expect("valid regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Resolves the index name for a factsheet.
///
/// Tries the "Index Variant:" line first, then a cascade of prose patterns,
/// and finally derives a name from the file name (`ind_nifty_200.pdf` becomes
/// `Nifty nifty 200`).
pub fn extract_index_name(text: &str, filename: &str) -> String {
    if let Some(name) = from_index_variant(text) {
        tracing::debug!("Index name from variant line: {}", name);
        return name;
    }

    if let Some(name) = from_prose(text) {
        tracing::debug!("Index name from prose: {}", name);
        return name;
    }

    let name = from_filename(filename);
    tracing::debug!("Index name from filename {}: {}", filename, name);
    name
}

fn from_index_variant(text: &str) -> Option<String> {
    for re in INDEX_VARIANT_RE.iter() {
        let Some(caps) = re.captures(text) else { continue };
        let raw = caps.get(1).map_or("", |m| m.as_str()).trim();

        let name = TRAILING_TRI_INDEX_RE.replace(raw, "");
        let name = TRAILING_TRI_RE.replace(&name, "");
        let name = TRAILING_INDEX_DOT_RE.replace(&name, "");
        let name = name.trim();
        if !name.is_empty() {
            return Some(name.to_string());
        }
    }
    None
}

fn from_prose(text: &str) -> Option<String> {
    for re in INDEX_NAME_RE.iter() {
        let Some(caps) = re.captures(text) else { continue };
        let raw = caps.get(1).map_or("", |m| m.as_str()).trim();
        let name = TRAILING_INDEX_RE.replace(raw, "");

        // Reject run-on phrases such as "Nifty 100 and the Nifty Midcap 150"
        if !name.is_empty() && !name.to_lowercase().contains("and the") && name.chars().count() > 5 {
            return Some(name.into_owned());
        }
        tracing::trace!("Rejected index name candidate '{}'", name);
    }
    None
}

fn from_filename(filename: &str) -> String {
    let name = filename.replace(".pdf", "");
    let name = FILE_IND_PREFIX_RE.replace(&name, "Nifty ");
    let name = FILE_FACTSHEET_PREFIX_RE.replace(&name, "");
    let name = name.replace('_', " ");
    let name = DIGIT_RUN_RE.replace_all(&name, " ${1}");
    WHITESPACE_RE.replace_all(&name, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_variant_strips_total_returns() {
        let text = "Portfolio Characteristics\nIndex Variant: Nifty500 Multicap Momentum Quality 50 Total Returns Index.\n";
        assert_eq!(extract_index_name(text, "x.pdf"), "Nifty500 Multicap Momentum Quality 50");
    }

    #[test]
    fn test_index_variant_without_suffix() {
        let text = "Index Variant: NIFTY Alpha 50.";
        assert_eq!(extract_index_name(text, "x.pdf"), "NIFTY Alpha 50");
    }

    #[test]
    fn test_index_variant_on_last_line() {
        let text = "Factsheet\nIndex Variant: Nifty50 Equal Weight\n";
        assert_eq!(extract_index_name(text, "x.pdf"), "Nifty50 Equal Weight");
        assert_eq!(extract_index_name(text.trim_end(), "x.pdf"), "Nifty50 Equal Weight");
    }

    #[test]
    fn test_quoted_name() {
        let text = "The methodology of the \u{2018}Nifty India Defence\u{2019} Index is described below.";
        assert_eq!(extract_index_name(text, "x.pdf"), "Nifty India Defence");
    }

    #[test]
    fn test_the_name_index_includes() {
        let text = "The Nifty200 Momentum 30 index includes top 30 companies";
        assert_eq!(extract_index_name(text, "x.pdf"), "Nifty200 Momentum 30");
    }

    #[test]
    fn test_low_volatility_variant() {
        let text = "Nifty Alpha Low-Volatility 30 Index is designed to reflect";
        assert_eq!(extract_index_name(text, "x.pdf"), "Nifty Alpha Low-Volatility 30");
    }

    #[test]
    fn test_rejects_and_the_phrases() {
        // The only prose candidate joins two subjects, so the filename wins
        let text = "Nifty Bank and the banking sector Index";
        assert_eq!(extract_index_name(text, "ind_niftybank.pdf"), "Nifty niftybank");
    }

    #[test]
    fn test_nifty_50_fallback() {
        assert_eq!(extract_index_name("Benchmark: nifty 50", "x.pdf"), "nifty 50");
    }

    #[test]
    fn test_filename_fallbacks() {
        assert_eq!(extract_index_name("", "ind_nifty_smallcap_250.pdf"), "Nifty nifty smallcap 250");
        assert_eq!(extract_index_name("", "Factsheet_NiftyTotalMarket.pdf"), "NiftyTotalMarket");
        assert_eq!(extract_index_name("", "ind_next50.pdf"), "Nifty next 50");
        assert_eq!(extract_index_name("no names here", "Factsheet_Nifty500LowVolatility50.pdf"), "Nifty 500LowVolatility 50");
    }
}
