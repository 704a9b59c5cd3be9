//! Mortality (qx) table analysis.

use serde::{Deserialize, Serialize};

use super::{PreparedSheet, SampleRow, SheetAnalyzer};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::inference::{
    coerce_series, numeric_summary, to_number, AnalyzerOutcome, CoercionSummary, ColumnRoleMap,
    NumericSummary, StatisticalAnalyzer,
};
use crate::input::{CellValue, Sheet};
use crate::schema::{ColumnRole, SheetType};

/// Span of ages tabulated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeRange {
    pub min: f64,
    pub max: f64,
    pub count: usize,
    pub coercion: CoercionSummary,
}

/// Statistics for a mortality table sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortalityTableStats {
    pub sheet: String,
    pub total_ages: usize,
    pub column_roles: ColumnRoleMap,
    pub valid_records: usize,
    pub error_records: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_range: Option<AnalyzerOutcome<AgeRange>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qx_male: Option<AnalyzerOutcome<NumericSummary>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qx_female: Option<AnalyzerOutcome<NumericSummary>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qx_overall: Option<AnalyzerOutcome<NumericSummary>>,
    pub sample_rows: Vec<SampleRow>,
}

pub struct MortalityTableAnalyzer {
    stats: StatisticalAnalyzer,
    sample_rows: usize,
}

impl MortalityTableAnalyzer {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            stats: StatisticalAnalyzer::with_config(config),
            sample_rows: config.sample_rows,
        }
    }

    fn age_range(&self, values: &[&CellValue]) -> AnalyzerOutcome<AgeRange> {
        let (ages, coercion) = coerce_series(values, to_number);
        match numeric_summary(&ages) {
            Some(summary) => AnalyzerOutcome::Computed(AgeRange {
                min: summary.min,
                max: summary.max,
                count: summary.count,
                coercion,
            }),
            None => AnalyzerOutcome::Insufficient {
                reason: "no valid ages found".to_string(),
                coercion: Some(coercion),
            },
        }
    }
}

impl SheetAnalyzer for MortalityTableAnalyzer {
    type Stats = MortalityTableStats;

    fn sheet_type(&self) -> SheetType {
        SheetType::MortalityTable
    }

    fn analyze(&self, sheet: &Sheet) -> Result<MortalityTableStats> {
        let prepared =
            PreparedSheet::new(sheet, self.sheet_type(), "mortality table sheet is empty")?;
        let qx = |v: &[&CellValue]| self.stats.numeric_statistics(v);

        Ok(MortalityTableStats {
            sheet: sheet.name.clone(),
            total_ages: prepared.table.row_count(),
            age_range: prepared.analyze_role(ColumnRole::Age, |v| self.age_range(v))?,
            qx_male: prepared.analyze_role(ColumnRole::QxMale, qx)?,
            qx_female: prepared.analyze_role(ColumnRole::QxFemale, qx)?,
            qx_overall: prepared.analyze_role(ColumnRole::QxOverall, qx)?,
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

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_sexed_qx_table() {
        let sheet = Sheet::from_values(
            "qx masc e fem",
            vec![
                vec![text("IDADE"), text("QX MASCULINO"), text("QX FEMININO")],
                vec![CellValue::Number(60.0), CellValue::Number(0.010), CellValue::Number(0.006)],
                vec![CellValue::Number(61.0), CellValue::Number(0.011), CellValue::Number(0.007)],
                vec![CellValue::Number(62.0), CellValue::Number(0.012), CellValue::Number(0.008)],
            ],
        );
        let stats = MortalityTableAnalyzer::new(&AnalysisConfig::default())
            .analyze(&sheet)
            .unwrap();

        assert_eq!(stats.column_roles.get(ColumnRole::QxMale), Some("QX MASCULINO"));
        assert_eq!(stats.column_roles.get(ColumnRole::QxFemale), Some("QX FEMININO"));
        assert_eq!(stats.column_roles.get(ColumnRole::QxOverall), None);
        assert!(stats.qx_overall.is_none());

        let male = stats.qx_male.as_ref().unwrap().computed().unwrap();
        assert_eq!(male.count, 3);
        assert!((male.mean - 0.011).abs() < 1e-12);
        assert!((male.median - 0.011).abs() < 1e-12);

        let female = stats.qx_female.as_ref().unwrap().computed().unwrap();
        assert_eq!(female.count, 3);
        assert_eq!(female.min, 0.006);
        assert_eq!(female.max, 0.008);

        let ages = stats.age_range.as_ref().unwrap().computed().unwrap();
        assert_eq!((ages.min, ages.max, ages.count), (60.0, 62.0, 3));
    }

    #[test]
    fn test_locale_qx_values() {
        let sheet = Sheet::from_values(
            "Tábua",
            vec![
                vec![text("x"), text("qx")],
                vec![CellValue::Number(0.0), text("0,0035")],
                vec![CellValue::Number(1.0), text("0,0004")],
            ],
        );
        let stats = MortalityTableAnalyzer::new(&AnalysisConfig::default())
            .analyze(&sheet)
            .unwrap();

        let overall = stats.qx_overall.as_ref().unwrap().computed().unwrap();
        assert_eq!(overall.count, 2);
        assert_eq!(overall.max, 0.0035);
    }
}
