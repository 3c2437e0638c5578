// src/extractors/fields.rs
use std::collections::BTreeMap;

/// One column of the indices table, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    IndicesName,
    Filename,
    Methodology,
    Constituents,
    LaunchDate,
    BaseDate,
    BaseValue,
    CalculationFrequency,
    IndexRebalancing,
    PriceReturnQtd,
    PriceReturnYtd,
    PriceReturn1Y,
    PriceReturn5Y,
    PriceReturnSinceInception,
    TotalReturnQtd,
    TotalReturnYtd,
    TotalReturn1Y,
    TotalReturn5Y,
    TotalReturnSinceInception,
    StdDev1Y,
    StdDev5Y,
    StdDevSinceInception,
    Beta1Y,
    Beta5Y,
    BetaSinceInception,
    PriceToEarnings,
    PriceToBook,
    DividendYield,
}

impl Field {
    pub const ALL: [Field; 28] = [
        Field::IndicesName,
        Field::Filename,
        Field::Methodology,
        Field::Constituents,
        Field::LaunchDate,
        Field::BaseDate,
        Field::BaseValue,
        Field::CalculationFrequency,
        Field::IndexRebalancing,
        Field::PriceReturnQtd,
        Field::PriceReturnYtd,
        Field::PriceReturn1Y,
        Field::PriceReturn5Y,
        Field::PriceReturnSinceInception,
        Field::TotalReturnQtd,
        Field::TotalReturnYtd,
        Field::TotalReturn1Y,
        Field::TotalReturn5Y,
        Field::TotalReturnSinceInception,
        Field::StdDev1Y,
        Field::StdDev5Y,
        Field::StdDevSinceInception,
        Field::Beta1Y,
        Field::Beta5Y,
        Field::BetaSinceInception,
        Field::PriceToEarnings,
        Field::PriceToBook,
        Field::DividendYield,
    ];

    /// CSV column header.
    pub fn header(self) -> &'static str {
        match self {
            Field::IndicesName => "Indices Name",
            Field::Filename => "Filename",
            Field::Methodology => "Methodology",
            Field::Constituents => "No. of Constituents",
            Field::LaunchDate => "Launch Date",
            Field::BaseDate => "Base Date",
            Field::BaseValue => "Base Value",
            Field::CalculationFrequency => "Calculation Frequency",
            Field::IndexRebalancing => "Index Rebalancing",
            Field::PriceReturnQtd => "Price Returns QTD",
            Field::PriceReturnYtd => "Price Returns YTD",
            Field::PriceReturn1Y => "Price Returns 1 year",
            Field::PriceReturn5Y => "Price Returns 5 years",
            Field::PriceReturnSinceInception => "Price Returns Since Inception",
            Field::TotalReturnQtd => "Total Returns QTD",
            Field::TotalReturnYtd => "Total Returns YTD",
            Field::TotalReturn1Y => "Total Returns 1 year",
            Field::TotalReturn5Y => "Total Returns 5 years",
            Field::TotalReturnSinceInception => "Total Returns Since Inception",
            Field::StdDev1Y => "Standard Deviation 1 year",
            Field::StdDev5Y => "Standard Deviation 5 year",
            Field::StdDevSinceInception => "Standard Deviation Since Inception",
            Field::Beta1Y => "Beta (Nifty 50) 1 year",
            Field::Beta5Y => "Beta (Nifty 50) 5 years",
            Field::BetaSinceInception => "Beta (Nifty 50) Since Inception",
            Field::PriceToEarnings => "P/E",
            Field::PriceToBook => "P/B",
            Field::DividendYield => "Dividend Yield",
        }
    }

    pub fn headers() -> Vec<&'static str> {
        Self::ALL.iter().map(|f| f.header()).collect()
    }
}

/// Partial extraction result: only the fields a heuristic found.
pub type FieldMap = BTreeMap<Field, String>;

/// A fully assembled row for the indices table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FactsheetRecord {
    values: FieldMap,
}

impl FactsheetRecord {
    pub fn new(index_name: &str, filename: &str) -> Self {
        let mut record = Self::default();
        record.set(Field::IndicesName, index_name);
        record.set(Field::Filename, filename);
        record
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    /// Value for a field, empty when nothing was extracted.
    pub fn get(&self, field: Field) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn merge(&mut self, found: FieldMap) {
        self.values.extend(found);
    }

    /// Values in column order.
    pub fn row(&self) -> Vec<String> {
        Field::ALL.iter().map(|f| self.get(*f).to_string()).collect()
    }

    /// Number of fields other than name and filename that carry a value.
    pub fn filled_count(&self) -> usize {
        self.values
            .iter()
            .filter(|(f, v)| !matches!(f, Field::IndicesName | Field::Filename) && !v.is_empty())
            .count()
    }

    /// Header to value map, used for JSON output.
    pub fn to_named_map(&self) -> BTreeMap<&'static str, &str> {
        Field::ALL.iter().map(|f| (f.header(), self.get(*f))).collect()
    }
}
