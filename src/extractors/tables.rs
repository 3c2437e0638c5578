// src/extractors/tables.rs

// Heuristics over reconstructed table grids. Cells arrive already
// normalized (see `pdf::table`), so comparisons only lowercase them.

use std::collections::HashMap;

use crate::extractors::fields::{Field, FieldMap};
use crate::pdf::Table;

const RETURNS_HEADER_KEYWORDS: [&str; 5] = ["qtd", "ytd", "1 year", "5 years", "since"];
const STATISTICS_HEADER_KEYWORDS: [&str; 4] = ["statistics", "1 year", "5 years", "since"];
const FUNDAMENTALS_HEADER_KEYWORDS: [&str; 3] = ["p/e", "p/b", "dividend yield"];

/// Time-window columns found in returns/statistics headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Period {
    Qtd,
    Ytd,
    OneYear,
    FiveYears,
    SinceInception,
}

/// Finds the value that sits next to a label anywhere in the tables.
///
/// Candidates, in order: the cell right of the label, the first cell when
/// the label is in the second column, and the cell two to the right. A
/// candidate is rejected when empty or when it is itself part of the key.
pub fn find_value_in_tables(tables: &[Table], search_key: &str) -> Option<String> {
    let key = search_key.to_lowercase();
    let acceptable = |value: &str| !value.is_empty() && !key.contains(&value.to_lowercase());

    for row in tables.iter().flatten() {
        for (i, cell) in row.iter().enumerate() {
            if !cell.to_lowercase().contains(&key) {
                continue;
            }
            if let Some(next) = row.get(i + 1).filter(|v| acceptable(v)) {
                return Some(next.clone());
            }
            if i == 1 {
                if let Some(first) = row.first().filter(|v| acceptable(v)) {
                    return Some(first.clone());
                }
            }
            if let Some(third) = row.get(i + 2).filter(|v| acceptable(v)) {
                return Some(third.clone());
            }
        }
    }
    None
}

fn header_mentions(header: &[String], keywords: &[&str]) -> bool {
    let text = header.join(" ").to_lowercase();
    keywords.iter().any(|kw| text.contains(kw))
}

/// Maps period columns in a header row. Later columns win on repeats.
fn period_columns(header: &[String], with_quarter_and_ytd: bool) -> HashMap<Period, usize> {
    let mut cols = HashMap::new();
    for (idx, cell) in header.iter().enumerate() {
        let h = cell.to_lowercase();
        let period = if with_quarter_and_ytd && h.contains("qtd") {
            Some(Period::Qtd)
        } else if with_quarter_and_ytd && h.contains("ytd") {
            Some(Period::Ytd)
        } else if (h.contains("1 year") || h.contains("1year")) && !h.contains('5') {
            Some(Period::OneYear)
        } else if h.contains("5 years") || h.contains("5year") {
            Some(Period::FiveYears)
        } else if h.contains("since") && h.contains("inception") {
            Some(Period::SinceInception)
        } else {
            None
        };
        if let Some(period) = period {
            cols.insert(period, idx);
        }
    }
    cols
}

/// Copies period cells of `row` into `out`.
///
/// `targets` pairs each period with its field and whether an empty cell
/// may still be recorded.
fn fill_periods(
    out: &mut FieldMap,
    row: &[String],
    cols: &HashMap<Period, usize>,
    targets: &[(Period, Field, bool)],
) {
    for (period, field, allow_empty) in targets {
        let Some(value) = cols.get(period).and_then(|idx| row.get(*idx)) else { continue };
        if *allow_empty || !value.is_empty() {
            out.insert(*field, value.clone());
        }
    }
}

/// Price and total return rows of the returns table.
pub fn extract_returns(tables: &[Table]) -> FieldMap {
    let mut returns = FieldMap::new();

    for table in tables.iter().filter(|t| t.len() >= 2) {
        let header = &table[0];
        if !header_mentions(header, &RETURNS_HEADER_KEYWORDS) {
            continue;
        }
        let cols = period_columns(header, true);

        let price_row = table[1..]
            .iter()
            .find(|row| row.len() > 1 && row[0].to_lowercase().contains("price return"));
        if let Some(row) = price_row {
            fill_periods(&mut returns, row, &cols, &[
                (Period::Qtd, Field::PriceReturnQtd, true),
                (Period::Ytd, Field::PriceReturnYtd, true),
                (Period::OneYear, Field::PriceReturn1Y, true),
                (Period::FiveYears, Field::PriceReturn5Y, true),
                (Period::SinceInception, Field::PriceReturnSinceInception, false),
            ]);
        }

        let total_row = table[1..]
            .iter()
            .find(|row| row.len() > 1 && row[0].to_lowercase().contains("total return"));
        if let Some(row) = total_row {
            fill_periods(&mut returns, row, &cols, &[
                (Period::Qtd, Field::TotalReturnQtd, true),
                (Period::Ytd, Field::TotalReturnYtd, true),
                (Period::OneYear, Field::TotalReturn1Y, true),
                (Period::FiveYears, Field::TotalReturn5Y, false),
                (Period::SinceInception, Field::TotalReturnSinceInception, false),
            ]);
        }
    }

    tracing::debug!("Extracted {} return fields", returns.len());
    returns
}

/// Standard deviation and beta rows of the statistics table.
pub fn extract_statistics(tables: &[Table]) -> FieldMap {
    let mut stats = FieldMap::new();

    for table in tables.iter().filter(|t| t.len() >= 2) {
        let header = &table[0];
        if !header_mentions(header, &STATISTICS_HEADER_KEYWORDS) {
            continue;
        }
        let cols = period_columns(header, false);

        for row in &table[1..] {
            let Some(label) = row.first().map(|c| c.to_lowercase()) else { continue };

            if label.contains("std") && label.contains("deviation") {
                fill_periods(&mut stats, row, &cols, &[
                    (Period::OneYear, Field::StdDev1Y, true),
                    (Period::FiveYears, Field::StdDev5Y, true),
                    (Period::SinceInception, Field::StdDevSinceInception, true),
                ]);
                continue;
            }

            let lead = row.iter().take(3).cloned().collect::<Vec<_>>().join(" ").to_lowercase();
            if label.contains("beta") && lead.contains("nifty") {
                fill_periods(&mut stats, row, &cols, &[
                    (Period::OneYear, Field::Beta1Y, true),
                    (Period::FiveYears, Field::Beta5Y, true),
                    (Period::SinceInception, Field::BetaSinceInception, true),
                ]);
            }
        }
    }

    tracing::debug!("Extracted {} statistics fields", stats.len());
    stats
}

/// P/E, P/B and dividend yield from a header row followed by a value row.
pub fn extract_fundamentals(tables: &[Table]) -> FieldMap {
    let mut fundamentals = FieldMap::new();

    for table in tables.iter().filter(|t| t.len() >= 2) {
        let header = &table[0];
        if !header_mentions(header, &FUNDAMENTALS_HEADER_KEYWORDS) {
            continue;
        }
        let values = &table[1];

        for (idx, cell) in header.iter().enumerate() {
            let Some(value) = values.get(idx) else { break };
            let h = cell.to_lowercase();
            let field = if h.contains("p/e") || h.contains("pe") {
                Field::PriceToEarnings
            } else if h.contains("p/b") || h.contains("pb") {
                Field::PriceToBook
            } else if h.contains("dividend yield") || h.contains("div yield") {
                Field::DividendYield
            } else {
                continue;
            };
            fundamentals.insert(field, value.clone());
        }
    }

    fundamentals
}
