//! Death registry analysis.

use serde::{Deserialize, Serialize};

use super::{PreparedSheet, SampleRow, SheetAnalyzer};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::inference::{
    AgeDistribution, AnalyzerOutcome, CategoricalDistribution, ColumnRoleMap, SexDistribution,
    StatisticalAnalyzer, TemporalDistribution,
};
use crate::input::Sheet;
use crate::schema::{ColumnRole, SheetType};

/// Statistics for a death registry sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeathRegistryStats {
    pub sheet: String,
    pub total_deaths: usize,
    pub column_roles: ColumnRoleMap,
    pub valid_records: usize,
    pub error_records: usize,
    /// Age at death.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_age: Option<AnalyzerOutcome<AgeDistribution>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<AnalyzerOutcome<SexDistribution>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<AnalyzerOutcome<CategoricalDistribution>>,
    /// Death dates with deaths-per-year trend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temporal: Option<AnalyzerOutcome<TemporalDistribution>>,
    pub sample_rows: Vec<SampleRow>,
}

pub struct DeathRegistryAnalyzer {
    stats: StatisticalAnalyzer,
    sample_rows: usize,
}

impl DeathRegistryAnalyzer {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            stats: StatisticalAnalyzer::with_config(config),
            sample_rows: config.sample_rows,
        }
    }
}

impl SheetAnalyzer for DeathRegistryAnalyzer {
    type Stats = DeathRegistryStats;

    fn sheet_type(&self) -> SheetType {
        SheetType::DeathRegistry
    }

    fn analyze(&self, sheet: &Sheet) -> Result<DeathRegistryStats> {
        let prepared =
            PreparedSheet::new(sheet, self.sheet_type(), "death registry sheet is empty")?;

        Ok(DeathRegistryStats {
            sheet: sheet.name.clone(),
            total_deaths: prepared.table.row_count(),
            death_age: prepared
                .analyze_role(ColumnRole::DeathAge, |v| self.stats.age_distribution(v))?,
            sex: prepared.analyze_role(ColumnRole::Sex, |v| self.stats.sex_distribution(v))?,
            cause: prepared
                .analyze_role(ColumnRole::Cause, |v| self.stats.categorical_distribution(v))?,
            temporal: prepared
                .analyze_role(ColumnRole::DeathDate, |v| self.stats.temporal_distribution(v))?,
            sample_rows: prepared.sample(self.sample_rows),
            valid_records: prepared.valid_records,
            error_records: prepared.error_records,
            column_roles: prepared.roles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::TrendDirection;
    use crate::input::CellValue;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn registry() -> Sheet {
        Sheet::from_values(
            "Óbitos",
            vec![
                vec![text("Idade Óbito"), text("Sexo"), text("Data do Óbito"), text("Causa")],
                vec![CellValue::Number(81.0), text("F"), text("2020-03-01"), text("Cardíaca")],
                vec![CellValue::Number(77.0), text("M"), text("2021-07-12"), text("Câncer")],
                vec![CellValue::Number(90.0), text("F"), text("2021-11-30"), text("Cardíaca")],
                vec![CellValue::Number(65.0), text("M"), text("2022-01-05"), CellValue::Empty],
                vec![CellValue::Number(88.0), text("M"), text("2022-02-14"), text("Cardíaca")],
                vec![CellValue::Number(70.0), text("F"), text("2022-09-09"), text("Outra")],
            ],
        )
    }

    #[test]
    fn test_registry_block() {
        let analyzer = DeathRegistryAnalyzer::new(&AnalysisConfig::default());
        let stats = analyzer.analyze(&registry()).unwrap();

        assert_eq!(stats.total_deaths, 6);
        assert_eq!(stats.valid_records, 5);
        assert_eq!(stats.error_records, 1);

        let ages = stats.death_age.as_ref().unwrap().computed().unwrap();
        assert_eq!(ages.stats.count, 6);
        assert_eq!(ages.stats.max, 90.0);

        let cause = stats.cause.as_ref().unwrap().computed().unwrap();
        assert_eq!(cause.counts["CARDÍACA"], 3);
        assert_eq!(cause.coercion.dropped, 1);

        let temporal = stats.temporal.as_ref().unwrap().computed().unwrap();
        assert_eq!(temporal.dates.by_year["2022"], 3);
        let trend = temporal.trend.computed().unwrap();
        assert_eq!(trend.years, 3);
        assert_eq!(trend.direction, TrendDirection::Increasing);
    }

    #[test]
    fn test_single_year_has_no_trend() {
        let sheet = Sheet::from_values(
            "obitos",
            vec![
                vec![text("Data Óbito")],
                vec![text("2021-01-01")],
                vec![text("2021-06-01")],
            ],
        );
        let stats = DeathRegistryAnalyzer::new(&AnalysisConfig::default())
            .analyze(&sheet)
            .unwrap();

        let temporal = stats.temporal.as_ref().unwrap().computed().unwrap();
        assert!(!temporal.trend.is_computed());
    }

    #[test]
    fn test_header_only_registry_fails_in_band() {
        let sheet = Sheet::from_values("Óbitos", vec![vec![text("Idade"), text("Sexo")]]);
        let outcome = DeathRegistryAnalyzer::new(&AnalysisConfig::default()).run(&sheet);

        assert!(!outcome.is_analyzed());
        assert_eq!(outcome.error(), Some("death registry sheet is empty"));
    }
}
