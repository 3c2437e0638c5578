// src/pdf/table.rs

// Factsheet tables come out of the text layer as lines whose columns are
// separated by wide gaps. We rebuild grids from those gaps.

use once_cell::sync::Lazy;
use regex::Regex;

/// A table grid: rows of cells. Missing cells are empty strings.
pub type Table = Vec<Vec<String>>;

const DEFAULT_MIN_COLUMN_GAP: usize = 2;

static WHITESPACE_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Knobs for table detection.
#[derive(Debug, Clone, Copy)]
pub struct TableSettings {
    /// Number of consecutive spaces that separates two cells.
    pub min_column_gap: usize,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self { min_column_gap: DEFAULT_MIN_COLUMN_GAP }
    }
}

impl TableSettings {
    fn gap_regex(&self) -> Regex {
        let gap = self.min_column_gap.max(1);
        Regex::new(&format!(r"\t+| {{{},}}", gap)).expect("valid column gap regex")
    }
}

/// Cleans a raw cell: trims and collapses internal whitespace and newlines.
pub fn normalize_value(value: &str) -> String {
    WHITESPACE_RUN_RE.replace_all(value.trim(), " ").into_owned()
}

/// A non-empty cell and the character column where it starts on its line.
#[derive(Debug, Clone, PartialEq)]
struct Span {
    start: usize,
    text: String,
}

/// Splits one line of page text into non-empty cells, keeping positions.
fn spans_of(line: &str, gap_re: &Regex) -> Vec<Span> {
    let mut bounds = Vec::new();
    let mut pos = 0;
    for gap in gap_re.find_iter(line) {
        bounds.push((pos, gap.start()));
        pos = gap.end();
    }
    bounds.push((pos, line.len()));

    bounds
        .into_iter()
        .filter_map(|(from, to)| {
            let raw = &line[from..to];
            let text = normalize_value(raw);
            if text.is_empty() {
                return None;
            }
            let byte_start = from + raw.len() - raw.trim_start().len();
            Some(Span { start: line[..byte_start].chars().count(), text })
        })
        .collect()
}

/// Places the cells of a short row under the columns of `reference`.
///
/// Cells keep their order. Each goes to the reference column whose start is
/// closest to the cell's start, corrected by the average offset of the cells
/// already placed, so a row printed slightly left or right of the reference
/// still lines up. Columns that receive no cell stay empty.
fn place_row(row: &[Span], reference: &[Span]) -> Vec<String> {
    let width = reference.len();
    let mut cells = vec![String::new(); width];
    let mut next_col = 0;
    let mut drift_sum = 0.0;

    for (i, span) in row.iter().enumerate() {
        let drift = if i == 0 { 0.0 } else { drift_sum / i as f64 };
        let expected = span.start as f64 + drift;
        let distance = |col: usize| (reference[col].start as f64 - expected).abs();

        // Leave enough columns for the cells still to come
        let last_col = width - (row.len() - i);
        let Some(col) = (next_col..=last_col).min_by(|a, b| distance(*a).total_cmp(&distance(*b))) else {
            break;
        };

        drift_sum += reference[col].start as f64 - span.start as f64;
        cells[col] = span.text.clone();
        next_col = col + 1;
    }
    cells
}

/// Turns a run of lines into a rectangular grid.
///
/// Rows with the most cells define the columns. Shorter rows are aligned
/// against the nearest full row above them (or below, for a leading short
/// row), so a blank value leaves an empty cell instead of shifting later
/// values into the wrong column.
fn align_columns(rows: &[Vec<Span>]) -> Table {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);

    rows.iter()
        .enumerate()
        .map(|(idx, row)| {
            let texts = || row.iter().map(|s| s.text.clone()).collect::<Vec<_>>();
            if row.len() == width {
                return texts();
            }
            let reference = rows[..idx]
                .iter()
                .rev()
                .chain(rows[idx + 1..].iter())
                .find(|r| r.len() == width);
            match reference {
                Some(reference) => place_row(row, reference),
                None => {
                    let mut cells = texts();
                    cells.resize(width, String::new());
                    cells
                }
            }
        })
        .collect()
}

/// Detects table grids in the text of a single page.
///
/// A run of consecutive lines that each split into two or more cells is a
/// table. Blank lines and single-cell lines close the current run. Runs with
/// fewer than two rows are discarded. Every row of a table has the same
/// number of cells; missing values are empty strings.
pub fn detect_tables(page_text: &str, settings: &TableSettings) -> Vec<Table> {
    let gap_re = settings.gap_regex();
    let mut tables = Vec::new();
    let mut current: Vec<Vec<Span>> = Vec::new();

    for line in page_text.lines() {
        let spans = spans_of(line, &gap_re);

        if spans.len() >= 2 {
            current.push(spans);
        } else {
            flush(&mut current, &mut tables);
        }
    }
    flush(&mut current, &mut tables);

    tracing::trace!("Detected {} tables on page", tables.len());
    tables
}

fn flush(current: &mut Vec<Vec<Span>>, tables: &mut Vec<Table>) {
    if current.len() >= 2 {
        tables.push(align_columns(current));
    }
    current.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_value() {
        assert_eq!(normalize_value("  Free Float\n Market   Cap  "), "Free Float Market Cap");
        assert_eq!(normalize_value(""), "");
    }

    fn cells_of(line: &str, settings: &TableSettings) -> Vec<String> {
        spans_of(line, &settings.gap_regex()).into_iter().map(|s| s.text).collect()
    }

    #[test]
    fn test_split_cells_respects_gap() {
        let settings = TableSettings::default();
        assert_eq!(
            cells_of("Price Return   1.23    -4.5   12.01", &settings),
            vec!["Price Return", "1.23", "-4.5", "12.01"]
        );
        // Single spaces never split a cell
        assert_eq!(cells_of("Base Date Nov 03, 1995", &settings), vec!["Base Date Nov 03, 1995"]);
    }

    #[test]
    fn test_spans_keep_character_columns() {
        let spans = spans_of("  Beta   1.02\t0.98", &TableSettings::default().gap_regex());
        let starts: Vec<usize> = spans.iter().map(|s| s.start).collect();
        assert_eq!(starts, vec![2, 9, 14]);
    }

    #[test]
    fn test_blank_cell_keeps_column_under_header() {
        let page = "Index Returns (%)   QTD   YTD   1 Year   5 Years   Since Inception\n\
                    Price Return   3.12   8.40   22.15   25.01   16.80\n\
                    Total Return   3.20   8.91   22.90            17.66\n";
        let tables = detect_tables(page, &TableSettings::default());
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0][2], vec!["Total Return", "3.20", "8.91", "22.90", "", "17.66"]);
    }

    #[test]
    fn test_blank_cell_against_header_only() {
        let page = "Index Returns (%)   QTD   YTD   1 Year   5 Years   Since Inception\n\
                    Total Return   3.20   8.91   22.90            17.66\n";
        let tables = detect_tables(page, &TableSettings::default());
        assert_eq!(tables[0][1], vec!["Total Return", "3.20", "8.91", "22.90", "", "17.66"]);
    }

    #[test]
    fn test_leading_blank_and_trailing_blank() {
        let page = "Label      QTD      YTD\n\
                    Full       1.0      2.0\n\
                    NoQtd               2.5\n\
                    NoYtd      1.5\n";
        let tables = detect_tables(page, &TableSettings::default());
        assert_eq!(tables[0][2], vec!["NoQtd", "", "2.5"]);
        assert_eq!(tables[0][3], vec!["NoYtd", "1.5", ""]);
    }

    #[test]
    fn test_detect_tables_groups_consecutive_rows() {
        let page = "Nifty 50 Index\n\
                    Index Returns (%)   QTD   YTD   1 Year\n\
                    Price Return   1.2   3.4   5.6\n\
                    Total Return   1.3   3.6   6.7\n\
                    \n\
                    Statistics   1 Year   5 Years\n\
                    Std. Deviation   12.1   17.3\n\
                    Lonely   row\n";
        let tables = detect_tables(page, &TableSettings::default());
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].len(), 3);
        assert_eq!(tables[0][0], vec!["Index Returns (%)", "QTD", "YTD", "1 Year"]);
        assert_eq!(tables[1][1], vec!["Std. Deviation", "12.1", "17.3"]);
        assert_eq!(tables[1].len(), 3);
    }

    #[test]
    fn test_detect_tables_drops_single_rows() {
        let page = "Header   only\nplain text line\nanother   single\n";
        assert!(detect_tables(page, &TableSettings::default()).is_empty());
    }

    #[test]
    fn test_wider_gap_setting() {
        let settings = TableSettings { min_column_gap: 4 };
        assert_eq!(cells_of("a  b    c", &settings), vec!["a b", "c"]);
    }
}
