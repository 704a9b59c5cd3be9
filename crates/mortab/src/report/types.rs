//! Report document types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::structure::FileStructure;
use crate::analysis::{
    DeathRegistryStats, MortalityTableStats, RosterStats, SheetOutcome,
};
use crate::config::AnalysisConfig;
use crate::error::MortabError;
use crate::input::SourceMetadata;
use crate::validation::ValidationLedger;

/// Spreadsheet reader version; matches the workspace pin.
const CALAMINE_VERSION: &str = "0.31";

/// Distribution library version behind the trend p-values; matches the workspace pin.
const STATRS_VERSION: &str = "0.18";

/// Versions of the components that produced a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolVersions {
    pub mortab: String,
    pub calamine: String,
    pub statrs: String,
}

impl ToolVersions {
    pub fn current() -> Self {
        Self {
            mortab: env!("CARGO_PKG_VERSION").to_string(),
            calamine: CALAMINE_VERSION.to_string(),
            statrs: STATRS_VERSION.to_string(),
        }
    }
}

/// File identity, timing, and configuration echo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    #[serde(flatten)]
    pub source: SourceMetadata,
    pub processed_at: DateTime<Utc>,
    pub configuration: AnalysisConfig,
    pub tools: ToolVersions,
}

/// Per-sheet-type results; a key is absent when no sheet of that type was scanned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roster: Option<SheetOutcome<RosterStats>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_registry: Option<SheetOutcome<DeathRegistryStats>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mortality_table: Option<SheetOutcome<MortalityTableStats>>,
}

/// Which datasets were analyzed successfully.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub roster_analyzed: bool,
    pub death_registry_analyzed: bool,
    pub mortality_table_analyzed: bool,
    pub total_formulas: usize,
}

impl Summary {
    /// Whether any dataset produced statistics.
    pub fn any_analyzed(&self) -> bool {
        self.roster_analyzed || self.death_registry_analyzed || self.mortality_table_analyzed
    }
}

/// Consolidated view across sheets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsolidatedStatistics {
    pub summary: Summary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roster: Option<RosterStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_registry: Option<DeathRegistryStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mortality_table: Option<MortalityTableStats>,
}

/// Complete output of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub file_structure: FileStructure,
    pub extracted_data: ExtractedData,
    pub statistics: ConsolidatedStatistics,
    pub validation: ValidationLedger,
}

impl Report {
    /// Serialize to a JSON string.
    pub fn to_json(&self, pretty: bool) -> crate::Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}

/// Output of a run that failed before any sheet was processed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub error: String,
    pub kind: String,
    pub validation: ValidationLedger,
}

impl ErrorReport {
    pub fn from_error(error: &MortabError) -> Self {
        let mut validation = ValidationLedger::new();
        validation.add_error(error.to_string());
        Self {
            error: error.to_string(),
            kind: error.kind().to_string(),
            validation,
        }
    }
}
