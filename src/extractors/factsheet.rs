// src/extractors/factsheet.rs
use crate::extractors::fields::{FactsheetRecord, Field};
use crate::extractors::index_name::extract_index_name;
use crate::extractors::tables::{extract_fundamentals, extract_returns, extract_statistics, find_value_in_tables};
use crate::extractors::text::find_value_in_text;
use crate::pdf::PdfContent;
use crate::utils::error::ExtractError;

/// Search keys for the descriptive fields, tried in order.
const BASIC_FIELD_KEYS: [(Field, &[&str]); 7] = [
    (Field::Methodology, &["methodology", "index methodology"]),
    (Field::Constituents, &["constituents", "number of constituents", "no. of constituents"]),
    (Field::LaunchDate, &["launch date", "launched on"]),
    (Field::BaseDate, &["base date", "base value date"]),
    (Field::BaseValue, &["base value", "base index value"]),
    (Field::CalculationFrequency, &["calculation frequency", "frequency"]),
    (Field::IndexRebalancing, &["rebalancing", "index rebalancing", "rebalancing frequency"]),
];

/// Builds a complete indices-table record from one factsheet.
///
/// Basic fields are looked up in the tables with every key first and only
/// then in the running text. Returns, statistics and fundamentals are
/// merged afterwards, in that order.
pub fn parse_factsheet(content: &PdfContent) -> Result<FactsheetRecord, ExtractError> {
    let text = content.text();
    if text.trim().is_empty() && content.tables.is_empty() {
        return Err(ExtractError::NoContent(content.file_name.clone()));
    }

    let index_name = extract_index_name(&text, &content.file_name);
    let mut record = FactsheetRecord::new(&index_name, &content.file_name);

    for (field, keys) in BASIC_FIELD_KEYS.iter() {
        let value = keys
            .iter()
            .find_map(|key| find_value_in_tables(&content.tables, key).filter(|v| !v.is_empty()))
            .or_else(|| {
                keys.iter()
                    .find_map(|key| find_value_in_text(&text, key).filter(|v| !v.is_empty()))
            });

        match value {
            Some(v) => record.set(*field, v),
            None => tracing::debug!("No value for '{}' in {}", field.header(), content.file_name),
        }
    }

    record.merge(extract_returns(&content.tables));
    record.merge(extract_statistics(&content.tables));
    record.merge(extract_fundamentals(&content.tables));

    tracing::debug!(
        "Parsed {} ({}): {} fields filled",
        content.file_name,
        index_name,
        record.filled_count()
    );
    Ok(record)
}
