// src/batch/mod.rs
pub mod factsheets;
pub mod inspect;
pub mod sectors;

use std::fmt;

/// Per-run counters reported at the end of a batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl RunSummary {
    pub fn log(&self) {
        tracing::info!("{}", "=".repeat(60));
        tracing::info!("Processing complete! {}", self);
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Successfully processed: {}, Skipped (already exists): {}, Errors: {}",
            self.processed, self.skipped, self.errors
        )
    }
}
