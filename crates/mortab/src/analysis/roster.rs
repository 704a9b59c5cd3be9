//! Population roster analysis.

use serde::{Deserialize, Serialize};

use super::{PreparedSheet, SampleRow, SheetAnalyzer};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::inference::{
    AgeDistribution, AnalyzerOutcome, ColumnRoleMap, DateDistribution, MonetaryDistribution,
    SexDistribution, StatisticalAnalyzer,
};
use crate::input::Sheet;
use crate::schema::{ColumnRole, SheetType};

/// Statistics for a roster sheet.
///
/// Distribution fields are absent when their column role did not resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterStats {
    pub sheet: String,
    pub total_records: usize,
    pub column_roles: ColumnRoleMap,
    /// Rows with a value in every resolved role column.
    pub valid_records: usize,
    pub error_records: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<AnalyzerOutcome<AgeDistribution>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<AnalyzerOutcome<SexDistribution>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<AnalyzerOutcome<DateDistribution>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<AnalyzerOutcome<MonetaryDistribution>>,
    pub sample_rows: Vec<SampleRow>,
}

pub struct RosterAnalyzer {
    stats: StatisticalAnalyzer,
    sample_rows: usize,
}

impl RosterAnalyzer {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            stats: StatisticalAnalyzer::with_config(config),
            sample_rows: config.sample_rows,
        }
    }
}

impl SheetAnalyzer for RosterAnalyzer {
    type Stats = RosterStats;

    fn sheet_type(&self) -> SheetType {
        SheetType::Roster
    }

    fn analyze(&self, sheet: &Sheet) -> Result<RosterStats> {
        let prepared = PreparedSheet::new(sheet, self.sheet_type(), "roster sheet is empty")?;

        Ok(RosterStats {
            sheet: sheet.name.clone(),
            total_records: prepared.table.row_count(),
            age: prepared.analyze_role(ColumnRole::Age, |v| self.stats.age_distribution(v))?,
            sex: prepared.analyze_role(ColumnRole::Sex, |v| self.stats.sex_distribution(v))?,
            birth_date: prepared
                .analyze_role(ColumnRole::BirthDate, |v| self.stats.date_distribution(v))?,
            salary: prepared
                .analyze_role(ColumnRole::Salary, |v| self.stats.monetary_distribution(v))?,
            sample_rows: prepared.sample(self.sample_rows),
            valid_records: prepared.valid_records,
            error_records: prepared.error_records,
            column_roles: prepared.roles,
        })
    }
}
