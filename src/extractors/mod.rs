// src/extractors/mod.rs
pub mod factsheet;
pub mod fields;
pub mod index_name;
pub mod matching;
pub mod sectors;
pub mod tables;
pub mod text;

// Re-export key extraction types for convenience
pub use factsheet::parse_factsheet;
pub use fields::{FactsheetRecord, Field};
pub use index_name::extract_index_name;
pub use matching::FilenameMatcher;
pub use sectors::{extract_sectors, SectorWeights};
