//! Statistical analyzers over a single extracted column.
//!
//! Every analyzer coerces its raw values first, drops what does not coerce,
//! and reports a [`CoercionSummary`] next to its statistics. An empty series
//! is an ordinary [`AnalyzerOutcome::Insufficient`] value, never an error.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

use super::coerce::{
    coerce_series, to_date, to_label, to_number, CoercionSummary, DropReason,
};
use crate::config::{AnalysisConfig, QuantileMethod};
use crate::input::CellValue;

/// Age bands as (label, inclusive upper bound); the last band is open-ended.
pub const AGE_BANDS: &[(&str, Option<f64>)] = &[
    ("<=20", Some(20.0)),
    ("21-30", Some(30.0)),
    ("31-40", Some(40.0)),
    ("41-50", Some(50.0)),
    ("51-60", Some(60.0)),
    ("61-70", Some(70.0)),
    (">70", None),
];

/// Sex synonyms, matched after upper-casing.
const SEX_SYNONYMS: &[(&str, SexCategory)] = &[
    ("M", SexCategory::Masculino),
    ("MASC", SexCategory::Masculino),
    ("MASCULINO", SexCategory::Masculino),
    ("MALE", SexCategory::Masculino),
    ("F", SexCategory::Feminino),
    ("FEM", SexCategory::Feminino),
    ("FEMININO", SexCategory::Feminino),
    ("FEMALE", SexCategory::Feminino),
];

// =============================================================================
// RESULT TYPES
// =============================================================================

/// Result of one analyzer: statistics, or an explicit reason there are none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalyzerOutcome<T> {
    Computed(T),
    Insufficient {
        reason: String,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        coercion: Option<CoercionSummary>,
    },
}

impl<T> AnalyzerOutcome<T> {
    fn insufficient(reason: impl Into<String>, coercion: Option<CoercionSummary>) -> Self {
        AnalyzerOutcome::Insufficient {
            reason: reason.into(),
            coercion,
        }
    }

    /// The computed statistics, if any.
    pub fn computed(&self) -> Option<&T> {
        match self {
            AnalyzerOutcome::Computed(value) => Some(value),
            AnalyzerOutcome::Insufficient { .. } => None,
        }
    }

    pub fn is_computed(&self) -> bool {
        matches!(self, AnalyzerOutcome::Computed(_))
    }
}

/// Descriptive statistics of a numeric series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

/// Age statistics plus band counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeDistribution {
    pub stats: NumericSummary,
    /// Counts per age band, in band order; sums to `stats.count`.
    pub bands: IndexMap<String, usize>,
    pub coercion: CoercionSummary,
}

/// Normalized sex category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SexCategory {
    Masculino,
    Feminino,
    Outros,
}

impl SexCategory {
    /// Normalize an upper-cased label through the synonym table.
    pub fn from_label(label: &str) -> Self {
        SEX_SYNONYMS
            .iter()
            .find(|(synonym, _)| *synonym == label)
            .map(|(_, category)| *category)
            .unwrap_or(SexCategory::Outros)
    }
}

/// Sex counts and percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SexDistribution {
    pub total: usize,
    pub counts: IndexMap<SexCategory, usize>,
    /// Percent of total, rounded to two decimals.
    pub percentages: IndexMap<SexCategory, f64>,
    pub coercion: CoercionSummary,
}

/// Most frequent labels of a free-text categorical column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalDistribution {
    pub total: usize,
    pub distinct: usize,
    /// Top labels by count, ties in order of first appearance.
    pub counts: IndexMap<String, usize>,
    /// Values whose label fell outside the top list.
    pub other: usize,
    pub coercion: CoercionSummary,
}

/// Date range and histograms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateDistribution {
    pub count: usize,
    pub min: NaiveDate,
    pub max: NaiveDate,
    /// Counts keyed by four-digit year.
    pub by_year: BTreeMap<String, usize>,
    /// Counts keyed by two-digit month of year.
    pub by_month: BTreeMap<String, usize>,
    pub coercion: CoercionSummary,
}

/// Quartiles of a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quartiles {
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
}

/// Monetary statistics with quartiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonetaryDistribution {
    pub stats: NumericSummary,
    pub quartiles: Quartiles,
    pub quantile_method: QuantileMethod,
    pub coercion: CoercionSummary,
}

/// Qualitative direction of a fitted trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

/// Least-squares fit of yearly event counts against calendar year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendResult {
    pub years: usize,
    pub slope: f64,
    pub intercept: f64,
    pub correlation: f64,
    pub r_squared: f64,
    pub p_value: f64,
    pub std_error: f64,
    pub direction: TrendDirection,
}

/// Event dates with their yearly trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalDistribution {
    pub dates: DateDistribution,
    pub trend: AnalyzerOutcome<TrendResult>,
}

// =============================================================================
// STREAMING STATISTICS
// =============================================================================
// Welford's online algorithm for mean and variance in a single pass.

#[derive(Debug, Clone)]
struct StreamingStats {
    count: usize,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl StreamingStats {
    fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    fn add(&mut self, value: f64) {
        self.count += 1;

        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;

        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    /// Population variance.
    fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / self.count as f64
        }
    }

    fn std(&self) -> f64 {
        self.variance().sqrt()
    }
}

// =============================================================================
// ANALYZER
// =============================================================================

/// Computes per-column distributions.
pub struct StatisticalAnalyzer {
    /// Quartile method for monetary series.
    quantile_method: QuantileMethod,
    /// Ages above this are dropped as out of range.
    max_plausible_age: Option<f64>,
    /// Labels kept in categorical tallies.
    top_categories: usize,
}

impl StatisticalAnalyzer {
    /// Create an analyzer with default settings.
    pub fn new() -> Self {
        Self {
            quantile_method: QuantileMethod::Linear,
            max_plausible_age: None,
            top_categories: 10,
        }
    }

    /// Create an analyzer honouring a run configuration.
    pub fn with_config(config: &AnalysisConfig) -> Self {
        Self {
            quantile_method: config.quantile_method,
            max_plausible_age: config.max_plausible_age,
            ..Self::new()
        }
    }

    /// Age statistics and band counts.
    pub fn age_distribution(&self, values: &[&CellValue]) -> AnalyzerOutcome<AgeDistribution> {
        let (mut ages, mut coercion) = coerce_series(values, to_number);

        if let Some(limit) = self.max_plausible_age {
            let before = ages.len();
            ages.retain(|&age| age <= limit);
            for _ in ages.len()..before {
                coercion.reject(DropReason::OutOfRange);
            }
        }

        let Some(stats) = numeric_summary(&ages) else {
            return AnalyzerOutcome::insufficient("no valid ages found", Some(coercion));
        };

        let mut bands: IndexMap<String, usize> =
            AGE_BANDS.iter().map(|(label, _)| (label.to_string(), 0)).collect();
        for &age in &ages {
            bands[age_band(age)] += 1;
        }

        AnalyzerOutcome::Computed(AgeDistribution {
            stats,
            bands,
            coercion,
        })
    }

    /// Sex counts after synonym normalization.
    pub fn sex_distribution(&self, values: &[&CellValue]) -> AnalyzerOutcome<SexDistribution> {
        let (labels, coercion) = coerce_series(values, to_label);
        if labels.is_empty() {
            return AnalyzerOutcome::insufficient("no valid sex values found", Some(coercion));
        }

        let mut tally: BTreeMap<SexCategory, usize> = BTreeMap::new();
        for label in &labels {
            *tally.entry(SexCategory::from_label(label)).or_insert(0) += 1;
        }

        let total = labels.len();
        let counts: IndexMap<SexCategory, usize> = tally.into_iter().collect();
        let percentages = counts
            .iter()
            .map(|(category, &count)| (*category, round2(count as f64 / total as f64 * 100.0)))
            .collect();

        AnalyzerOutcome::Computed(SexDistribution {
            total,
            counts,
            percentages,
            coercion,
        })
    }

    /// Top labels of a free-text column such as cause of death.
    pub fn categorical_distribution(
        &self,
        values: &[&CellValue],
    ) -> AnalyzerOutcome<CategoricalDistribution> {
        let (labels, coercion) = coerce_series(values, to_label);
        if labels.is_empty() {
            return AnalyzerOutcome::insufficient("no valid values found", Some(coercion));
        }

        let mut tally: IndexMap<String, usize> = IndexMap::new();
        for label in labels {
            *tally.entry(label).or_insert(0) += 1;
        }

        let total: usize = tally.values().sum();
        let distinct = tally.len();
        // Stable sort keeps first-appearance order among equal counts.
        tally.sort_by(|_, a, _, b| b.cmp(a));
        let counts: IndexMap<String, usize> =
            tally.into_iter().take(self.top_categories).collect();
        let other = total - counts.values().sum::<usize>();

        AnalyzerOutcome::Computed(CategoricalDistribution {
            total,
            distinct,
            counts,
            other,
            coercion,
        })
    }

    /// Date range with per-year and per-month histograms.
    pub fn date_distribution(&self, values: &[&CellValue]) -> AnalyzerOutcome<DateDistribution> {
        let (dates, coercion) = coerce_series(values, to_date);
        match date_histogram(&dates, coercion) {
            Ok(distribution) => AnalyzerOutcome::Computed(distribution),
            Err(coercion) => AnalyzerOutcome::insufficient("no valid dates found", Some(coercion)),
        }
    }

    /// Numeric statistics and quartiles of a monetary column.
    pub fn monetary_distribution(
        &self,
        values: &[&CellValue],
    ) -> AnalyzerOutcome<MonetaryDistribution> {
        let (amounts, coercion) = coerce_series(values, to_number);
        let Some(stats) = numeric_summary(&amounts) else {
            return AnalyzerOutcome::insufficient(
                "no valid monetary values found",
                Some(coercion),
            );
        };

        let sorted = sorted(&amounts);
        let quartiles = Quartiles {
            q1: quantile(&sorted, 0.25, self.quantile_method),
            q2: quantile(&sorted, 0.50, self.quantile_method),
            q3: quantile(&sorted, 0.75, self.quantile_method),
        };

        AnalyzerOutcome::Computed(MonetaryDistribution {
            stats,
            quartiles,
            quantile_method: self.quantile_method,
            coercion,
        })
    }

    /// Event dates plus the trend of yearly counts.
    pub fn temporal_distribution(
        &self,
        values: &[&CellValue],
    ) -> AnalyzerOutcome<TemporalDistribution> {
        let (dates, coercion) = coerce_series(values, to_date);
        let trend = yearly_trend(&dates);
        match date_histogram(&dates, coercion) {
            Ok(dates) => AnalyzerOutcome::Computed(TemporalDistribution { dates, trend }),
            Err(coercion) => {
                AnalyzerOutcome::insufficient("no valid event dates found", Some(coercion))
            }
        }
    }

    /// Plain descriptive statistics of a numeric column.
    pub fn numeric_statistics(&self, values: &[&CellValue]) -> AnalyzerOutcome<NumericSummary> {
        let (numbers, coercion) = coerce_series(values, to_number);
        match numeric_summary(&numbers) {
            Some(stats) => AnalyzerOutcome::Computed(stats),
            None => AnalyzerOutcome::insufficient("no valid numeric values found", Some(coercion)),
        }
    }
}

impl Default for StatisticalAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// PURE HELPERS
// =============================================================================

/// Band label for an age.
pub fn age_band(age: f64) -> &'static str {
    AGE_BANDS
        .iter()
        .find(|(_, upper)| upper.is_none_or(|u| age <= u))
        .map(|(label, _)| *label)
        .unwrap_or(">70")
}

/// Mean, median, population stdev, min, max; `None` for an empty series.
pub fn numeric_summary(values: &[f64]) -> Option<NumericSummary> {
    if values.is_empty() {
        return None;
    }

    let mut stats = StreamingStats::new();
    for &value in values {
        stats.add(value);
    }

    Some(NumericSummary {
        count: stats.count,
        mean: stats.mean,
        median: quantile(&sorted(values), 0.5, QuantileMethod::Linear),
        std_dev: stats.std(),
        min: stats.min,
        max: stats.max,
    })
}

/// Quantile `p` (0..=1) of an ascending, non-empty slice.
pub fn quantile(sorted: &[f64], p: f64, method: QuantileMethod) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let n = sorted.len();
    match method {
        QuantileMethod::Linear => {
            let h = (n - 1) as f64 * p;
            let lo = h.floor() as usize;
            let hi = (lo + 1).min(n - 1);
            sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
        }
        QuantileMethod::NearestRank => {
            let rank = ((p * n as f64).ceil() as usize).clamp(1, n);
            sorted[rank - 1]
        }
    }
}

/// Ordinary least squares of events-per-year against year.
///
/// Fewer than two distinct years yields `Insufficient`.
pub fn yearly_trend(dates: &[NaiveDate]) -> AnalyzerOutcome<TrendResult> {
    let mut per_year: BTreeMap<i32, usize> = BTreeMap::new();
    for date in dates {
        *per_year.entry(date.year()).or_insert(0) += 1;
    }

    if per_year.len() < 2 {
        return AnalyzerOutcome::insufficient(
            format!(
                "insufficient data for trend: {} distinct year(s), need at least 2",
                per_year.len()
            ),
            None,
        );
    }

    let xs: Vec<f64> = per_year.keys().map(|&y| y as f64).collect();
    let ys: Vec<f64> = per_year.values().map(|&c| c as f64).collect();
    AnalyzerOutcome::Computed(linear_regression(&xs, &ys))
}

/// Simple linear regression with a two-sided t-test on the slope.
fn linear_regression(xs: &[f64], ys: &[f64]) -> TrendResult {
    let n = xs.len() as f64;
    let x_mean = xs.iter().sum::<f64>() / n;
    let y_mean = ys.iter().sum::<f64>() / n;

    let mut ss_x = 0.0;
    let mut ss_y = 0.0;
    let mut ss_xy = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - x_mean;
        let dy = y - y_mean;
        ss_x += dx * dx;
        ss_y += dy * dy;
        ss_xy += dx * dy;
    }

    let slope = ss_xy / ss_x;
    let intercept = y_mean - slope * x_mean;
    let correlation = if ss_y == 0.0 {
        0.0
    } else {
        (ss_xy / (ss_x * ss_y).sqrt()).clamp(-1.0, 1.0)
    };

    let df = xs.len() - 2;
    let (p_value, std_error) = if df == 0 {
        // A line through two points fits exactly.
        let p = if ys[0] == ys[1] { 1.0 } else { 0.0 };
        (p, 0.0)
    } else {
        let df_f = df as f64;
        let r2 = correlation * correlation;
        let t = correlation * (df_f / ((1.0 - correlation) * (1.0 + correlation) + 1e-20)).sqrt();
        let p = StudentsT::new(0.0, 1.0, df_f)
            .map(|dist| (2.0 * dist.sf(t.abs())).min(1.0))
            .unwrap_or(1.0);
        let se = ((1.0 - r2) * ss_y / ss_x / df_f).max(0.0).sqrt();
        (p, se)
    };

    let direction = if slope > 0.0 {
        TrendDirection::Increasing
    } else if slope < 0.0 {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    };

    TrendResult {
        years: xs.len(),
        slope,
        intercept,
        correlation,
        r_squared: correlation * correlation,
        p_value,
        std_error,
        direction,
    }
}

fn date_histogram(
    dates: &[NaiveDate],
    coercion: CoercionSummary,
) -> std::result::Result<DateDistribution, CoercionSummary> {
    let (Some(min), Some(max)) = (dates.iter().min(), dates.iter().max()) else {
        return Err(coercion);
    };

    let mut by_year = BTreeMap::new();
    let mut by_month = BTreeMap::new();
    for date in dates {
        *by_year.entry(format!("{:04}", date.year())).or_insert(0) += 1;
        *by_month.entry(format!("{:02}", date.month())).or_insert(0) += 1;
    }

    Ok(DateDistribution {
        count: dates.len(),
        min: *min,
        max: *max,
        by_year,
        by_month,
        coercion,
    })
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
