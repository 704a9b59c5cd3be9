//! Caller-supplied analysis configuration.

use serde::{Deserialize, Serialize};

use crate::error::{MortabError, Result};

/// How quartiles of a monetary series are computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantileMethod {
    /// Linear interpolation between closest ranks.
    #[default]
    Linear,
    /// Smallest value whose rank covers the requested fraction.
    NearestRank,
}

/// Configuration for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Case-insensitive substrings restricting which sheets are scanned.
    #[serde(alias = "planilhasEspecificas")]
    pub sheet_name_filters: Vec<String>,
    /// Whether to record every formula cell.
    #[serde(alias = "extrairFormulas")]
    pub extract_formulas: bool,
    /// Quartile method for monetary distributions.
    pub quantile_method: QuantileMethod,
    /// Ages above this value are dropped instead of bucketed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_plausible_age: Option<f64>,
    /// Number of leading records echoed per analyzed sheet.
    pub sample_rows: usize,
    /// Record sheet-level failures as ledger errors instead of warnings.
    pub escalate_sheet_errors: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sheet_name_filters: Vec::new(),
            extract_formulas: true,
            quantile_method: QuantileMethod::Linear,
            max_plausible_age: None,
            sample_rows: 5,
            escalate_sheet_errors: false,
        }
    }
}

impl AnalysisConfig {
    /// Parse a configuration from a JSON object.
    ///
    /// An empty or whitespace-only input yields the default configuration.
    pub fn from_json(input: &str) -> Result<Self> {
        if input.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: AnalysisConfig = serde_json::from_str(input)
            .map_err(|e| MortabError::Config(format!("invalid configuration JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if let Some(max) = self.max_plausible_age {
            if !max.is_finite() || max <= 0.0 {
                return Err(MortabError::Config(format!(
                    "max_plausible_age must be a positive number, got {}",
                    max
                )));
            }
        }
        Ok(())
    }

    /// Builder: restrict scanning to sheets matching any of the filters.
    pub fn with_sheet_filters<I, S>(mut self, filters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sheet_name_filters = filters.into_iter().map(Into::into).collect();
        self
    }

    /// Builder: toggle the formula census.
    pub fn with_formulas(mut self, extract: bool) -> Self {
        self.extract_formulas = extract;
        self
    }
}
