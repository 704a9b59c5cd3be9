//! Identity of the analyzed workbook file.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata about the source workbook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected container format (xlsx, xls, ods, ...).
    pub format: String,
    /// When the workbook was opened.
    pub opened_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a workbook that has been opened.
    pub fn new(path: PathBuf, hash: String, size_bytes: u64) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let format = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_else(|| "unknown".to_string());

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            opened_at: Utc::now(),
        }
    }
}
