//! Inference over extracted sheets: what a sheet is, which columns mean
//! what, and what the values say.

mod classifier;
mod coerce;
mod semantic;
mod statistical;

pub use classifier::sheet_type;
pub use coerce::{
    coerce_series, parse_locale_number, to_date, to_label, to_number, Coercion, CoercionSummary,
    DropReason,
};
pub use semantic::{ColumnRoleMap, ColumnRoleResolver};
pub use statistical::{
    age_band, numeric_summary, quantile, yearly_trend, AgeDistribution, AnalyzerOutcome,
    CategoricalDistribution, DateDistribution, MonetaryDistribution, NumericSummary, Quartiles,
    SexCategory, SexDistribution, StatisticalAnalyzer, TemporalDistribution, TrendDirection,
    TrendResult, AGE_BANDS,
};
