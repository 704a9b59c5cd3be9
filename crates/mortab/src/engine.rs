//! Main Mortab struct and public API.

use std::path::Path;

use chrono::Utc;
use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::analysis::{
    DeathRegistryAnalyzer, MortalityTableAnalyzer, RosterAnalyzer, SheetAnalyzer, SheetOutcome,
};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::inference::sheet_type;
use crate::input::{LoaderConfig, Sheet, SourceMetadata, Workbook, WorkbookLoader};
use crate::report::{
    consolidate, ExtractedData, FileStructure, Report, ReportMetadata, ToolVersions,
};
use crate::schema::SheetType;
use crate::validation::ValidationLedger;

/// The main Mortab analysis engine.
///
/// Stateless between runs: every call to [`Mortab::analyze`] opens the
/// workbook, builds a fresh ledger, and returns an independent report.
pub struct Mortab {
    config: AnalysisConfig,
    loader: WorkbookLoader,
    roster: RosterAnalyzer,
    death_registry: DeathRegistryAnalyzer,
    mortality_table: MortalityTableAnalyzer,
}

impl Mortab {
    /// Create an engine with the default configuration.
    pub fn new() -> Self {
        Self::with_config(AnalysisConfig::default())
    }

    /// Create an engine with a custom configuration.
    pub fn with_config(config: AnalysisConfig) -> Self {
        let loader = WorkbookLoader::with_config(LoaderConfig {
            sheet_name_filters: config.sheet_name_filters.clone(),
            read_formulas: config.extract_formulas,
        });

        Self {
            roster: RosterAnalyzer::new(&config),
            death_registry: DeathRegistryAnalyzer::new(&config),
            mortality_table: MortalityTableAnalyzer::new(&config),
            loader,
            config,
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze a workbook file.
    ///
    /// Fails only when the configuration is invalid or the file cannot be
    /// opened as a spreadsheet; sheet-level problems land in the report.
    pub fn analyze(&self, path: impl AsRef<Path>) -> Result<Report> {
        let path = path.as_ref();
        self.config.validate()?;

        let (workbook, source) = self.loader.load(path)?;
        info!(
            file = %source.file,
            sheets = workbook.available_sheets.len(),
            scanned = workbook.sheets.len(),
            "analyzing workbook"
        );

        let report = self.analyze_workbook(&workbook, source);
        info!(
            errors = report.validation.errors().len(),
            warnings = report.validation.warnings().len(),
            integrity_ok = report.validation.integrity_ok(),
            "analysis complete"
        );
        Ok(report)
    }

    /// Analyze an already-loaded workbook.
    pub fn analyze_workbook(&self, workbook: &Workbook, source: SourceMetadata) -> Report {
        let mut ledger = ValidationLedger::new();

        if workbook.filter_fallback {
            self.advise(
                &mut ledger,
                format!(
                    "sheet name filters {:?} matched no sheet; scanning all {} sheets",
                    self.config.sheet_name_filters,
                    workbook.sheets.len()
                ),
            );
        }

        let file_structure = FileStructure::survey(workbook, self.config.extract_formulas);

        let mut extracted = ExtractedData::default();
        let mut claimed: IndexMap<SheetType, &str> = IndexMap::new();
        for sheet in &workbook.sheets {
            let kind = sheet_type(&sheet.name);
            debug!(sheet = %sheet.name, sheet_type = kind.label(), "classified sheet");

            if kind == SheetType::Unclassified {
                continue;
            }
            // Later sheets of the same type replace earlier ones.
            if let Some(replaced) = claimed.insert(kind, &sheet.name) {
                self.advise(
                    &mut ledger,
                    format!(
                        "sheet '{}' also classifies as {}; it replaces '{}'",
                        sheet.name,
                        kind.label().to_lowercase(),
                        replaced
                    ),
                );
            }

            match kind {
                SheetType::Roster => {
                    extracted.roster = Some(self.run(&self.roster, sheet, &mut ledger));
                }
                SheetType::DeathRegistry => {
                    extracted.death_registry =
                        Some(self.run(&self.death_registry, sheet, &mut ledger));
                }
                SheetType::MortalityTable => {
                    extracted.mortality_table =
                        Some(self.run(&self.mortality_table, sheet, &mut ledger));
                }
                SheetType::Unclassified => {}
            }
        }

        let statistics = consolidate(&extracted, file_structure.formula_count, &mut ledger);

        Report {
            metadata: ReportMetadata {
                source,
                processed_at: Utc::now(),
                configuration: self.config.clone(),
                tools: ToolVersions::current(),
            },
            file_structure,
            extracted_data: extracted,
            statistics,
            validation: ledger,
        }
    }

    /// Run one sheet pipeline, recording a failure in the ledger.
    fn run<A: SheetAnalyzer>(
        &self,
        analyzer: &A,
        sheet: &Sheet,
        ledger: &mut ValidationLedger,
    ) -> SheetOutcome<A::Stats> {
        let outcome = analyzer.run(sheet);
        if let Some(error) = outcome.error() {
            let message = format!(
                "{} sheet '{}': {}",
                analyzer.sheet_type().label().to_lowercase(),
                sheet.name,
                error
            );
            if self.config.escalate_sheet_errors {
                ledger.add_error(message);
            } else {
                ledger.add_warning(message);
            }
        }
        outcome
    }

    fn advise(&self, ledger: &mut ValidationLedger, message: String) {
        warn!("{}", message);
        ledger.add_warning(message);
    }
}

impl Default for Mortab {
    fn default() -> Self {
        Self::new()
    }
}
