//! Error types for the Mortab library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Mortab operations.
#[derive(Debug, Error)]
pub enum MortabError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The spreadsheet container could not be opened or a sheet could not be read.
    #[error("Workbook error for '{path}': {message}")]
    Workbook { path: PathBuf, message: String },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Sheet has a header but no data rows.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Failure inside a sheet-level analysis pipeline.
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Error saving or loading a report.
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl MortabError {
    /// Whether this error aborts the whole run rather than a single sheet.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            MortabError::Io { .. }
                | MortabError::Workbook { .. }
                | MortabError::Config(_)
                | MortabError::Json(_)
        )
    }

    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            MortabError::Io { .. } => "io",
            MortabError::Workbook { .. } => "workbook",
            MortabError::Config(_) => "config",
            MortabError::Json(_) => "json",
            MortabError::EmptyData(_) => "empty_data",
            MortabError::Analysis(_) => "analysis",
            MortabError::Persistence(_) => "persistence",
        }
    }
}

/// Result type alias for Mortab operations.
pub type Result<T> = std::result::Result<T, MortabError>;
