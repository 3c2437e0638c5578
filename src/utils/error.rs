// src/utils/error.rs
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum PdfError {
    #[error("I/O error reading PDF: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to extract text from {file}: {reason}")]
    TextExtraction { file: String, reason: String },

    #[error("Failed to parse PDF structure: {0}")]
    Structure(String),
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Could not extract any content from {0}")]
    NoContent(String),

    #[error("No sector table found in {0}")]
    NoSectors(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("PDF handling failed: {0}")]
    Pdf(#[from] PdfError),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Data processing failed: {0}")]
    Processing(String),
}
