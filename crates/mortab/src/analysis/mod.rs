//! Per-sheet analysis pipelines.
//!
//! Each sheet type has one analyzer that resolves column roles, extracts the
//! data area, and runs the statistical analyzers for every resolved role.
//! Failures are caught at this boundary and returned as
//! [`SheetOutcome::Failed`] so one bad sheet never aborts the run.

mod death_registry;
mod mortality_table;
mod roster;

pub use death_registry::{DeathRegistryAnalyzer, DeathRegistryStats};
pub use mortality_table::{AgeRange, MortalityTableAnalyzer, MortalityTableStats};
pub use roster::{RosterAnalyzer, RosterStats};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{MortabError, Result};
use crate::inference::{ColumnRoleMap, ColumnRoleResolver};
use crate::input::{CellValue, ExtractedTable, Sheet};
use crate::schema::{ColumnRole, SheetType};

/// One leading record of a sheet, keyed by header.
pub type SampleRow = IndexMap<String, CellValue>;

/// Result of analyzing one sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SheetOutcome<T> {
    /// The pipeline ran; statistics follow.
    Analyzed(T),
    /// The pipeline failed for this sheet only.
    Failed { sheet: String, error: String },
}

impl<T> SheetOutcome<T> {
    /// The statistics block, if the sheet was analyzed.
    pub fn stats(&self) -> Option<&T> {
        match self {
            SheetOutcome::Analyzed(stats) => Some(stats),
            SheetOutcome::Failed { .. } => None,
        }
    }

    pub fn is_analyzed(&self) -> bool {
        matches!(self, SheetOutcome::Analyzed(_))
    }

    /// The failure description, if the sheet failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            SheetOutcome::Analyzed(_) => None,
            SheetOutcome::Failed { error, .. } => Some(error),
        }
    }
}

/// A pipeline for one sheet type.
pub trait SheetAnalyzer {
    /// Statistics block produced for an analyzed sheet.
    type Stats;

    /// The sheet type this analyzer handles.
    fn sheet_type(&self) -> SheetType;

    /// Run the pipeline, propagating any failure.
    fn analyze(&self, sheet: &Sheet) -> Result<Self::Stats>;

    /// Run the pipeline, converting failure into an in-band outcome.
    fn run(&self, sheet: &Sheet) -> SheetOutcome<Self::Stats> {
        match self.analyze(sheet) {
            Ok(stats) => SheetOutcome::Analyzed(stats),
            Err(e) => {
                warn!(sheet = %sheet.name, error = %e, "sheet analysis failed");
                SheetOutcome::Failed {
                    sheet: sheet.name.clone(),
                    error: describe(&e),
                }
            }
        }
    }
}

/// Short description of a sheet-local failure.
fn describe(error: &MortabError) -> String {
    match error {
        MortabError::EmptyData(message) | MortabError::Analysis(message) => message.clone(),
        other => other.to_string(),
    }
}

/// Extracted table plus role assignment and completeness counts.
pub(crate) struct PreparedSheet {
    pub table: ExtractedTable,
    pub roles: ColumnRoleMap,
    pub valid_records: usize,
    pub error_records: usize,
}

impl PreparedSheet {
    /// Resolve roles and extract the data area of a sheet.
    ///
    /// Fails with [`MortabError::EmptyData`] when there are no data rows.
    pub fn new(sheet: &Sheet, sheet_type: SheetType, empty_message: &str) -> Result<Self> {
        let table = ExtractedTable::from_sheet(sheet);
        if table.is_empty() {
            return Err(MortabError::EmptyData(empty_message.to_string()));
        }

        let roles = ColumnRoleResolver::new(sheet_type).resolve(&table.headers);
        let valid_records = table.complete_rows(&roles.resolved_headers());
        let error_records = table.row_count() - valid_records;

        debug!(
            sheet = %sheet.name,
            sheet_type = sheet_type.label(),
            rows = table.row_count(),
            resolved = roles.resolved().count(),
            unresolved = ?roles.unresolved(),
            "prepared sheet"
        );

        Ok(Self {
            table,
            roles,
            valid_records,
            error_records,
        })
    }

    /// Values of the column assigned to a role; `None` when unresolved.
    pub fn role_values(&self, role: ColumnRole) -> Result<Option<Vec<&CellValue>>> {
        let Some(header) = self.roles.get(role) else {
            return Ok(None);
        };
        self.table.column(header).map(Some).ok_or_else(|| {
            MortabError::Analysis(format!(
                "column '{}' for role {} is missing from the extracted table",
                header,
                role.as_str()
            ))
        })
    }

    /// Run an analyzer over a role's values when the role is resolved.
    pub fn analyze_role<T>(
        &self,
        role: ColumnRole,
        analyze: impl FnOnce(&[&CellValue]) -> T,
    ) -> Result<Option<T>> {
        Ok(self.role_values(role)?.map(|values| analyze(&values)))
    }

    pub fn sample(&self, n: usize) -> Vec<SampleRow> {
        self.table.head(n)
    }
}
