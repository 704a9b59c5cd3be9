//! Consolidated report assembly and persistence.

mod consolidator;
mod persistence;
mod structure;
mod types;

pub use consolidator::{consolidate, NO_DATA_WARNING};
pub use structure::{formula_census, FileStructure, FormulaEntry, SheetOverview};
pub use types::{
    ConsolidatedStatistics, ErrorReport, ExtractedData, Report, ReportMetadata, Summary,
    ToolVersions,
};
