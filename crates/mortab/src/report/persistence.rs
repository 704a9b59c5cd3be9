//! Persistence for reports - save/load JSON files.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::error::{MortabError, Result};

use super::types::Report;

impl Report {
    /// Save the report as pretty JSON, creating parent directories.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use mortab::Report;
    /// # fn example(report: &Report) -> mortab::Result<()> {
    /// report.save("out/massa.report.json")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    MortabError::Persistence(format!(
                        "Failed to create directory '{}': {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let file = File::create(path).map_err(|e| {
            MortabError::Persistence(format!(
                "Failed to create file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| MortabError::Persistence(format!("Failed to serialize report: {}", e)))?;

        Ok(())
    }

    /// Load a report previously written by [`Report::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| {
            MortabError::Persistence(format!("Failed to open file '{}': {}", path.display(), e))
        })?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader).map_err(|e| {
            MortabError::Persistence(format!(
                "Failed to parse report '{}': {}",
                path.display(),
                e
            ))
        })
    }
}
