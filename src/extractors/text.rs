// src/extractors/text.rs
use once_cell::sync::Lazy;
use regex::Regex;

static KEY_VALUE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[:=]\s*(.+)").expect("valid key/value regex"));

/// Finds a labelled value in free text.
///
/// On the first line mentioning `search_key`, takes whatever follows a `:`
/// or `=`; a separator followed by nothing counts as not found. Without a
/// separator, falls back to the next line unless that line is empty or
/// starts with the key again.
pub fn find_value_in_text(text: &str, search_key: &str) -> Option<String> {
    let key = search_key.to_lowercase();
    let lines: Vec<&str> = text.split('\n').collect();

    for (i, line) in lines.iter().enumerate() {
        if !line.to_lowercase().contains(&key) {
            continue;
        }
        if let Some(caps) = KEY_VALUE_RE.captures(line) {
            let value = caps.get(1).map_or("", |m| m.as_str().trim());
            return (!value.is_empty()).then(|| value.to_string());
        }
        if let Some(next) = lines.get(i + 1).map(|l| l.trim()) {
            if !next.is_empty() && !next.to_lowercase().starts_with(&key) {
                return Some(next.to_string());
            }
        }
    }
    None
}
