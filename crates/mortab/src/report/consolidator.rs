//! Merge per-sheet results into the consolidated statistics block.

use tracing::warn;

use super::types::{ConsolidatedStatistics, ExtractedData, Summary};
use crate::validation::ValidationLedger;

/// Advisory appended when no dataset produced statistics.
pub const NO_DATA_WARNING: &str = "no specific data was extracted";

/// Build summary flags and copy every analyzed block.
///
/// When nothing was analyzed a warning is appended; integrity is untouched.
pub fn consolidate(
    extracted: &ExtractedData,
    total_formulas: usize,
    ledger: &mut ValidationLedger,
) -> ConsolidatedStatistics {
    let roster = extracted.roster.as_ref().and_then(|o| o.stats()).cloned();
    let death_registry = extracted
        .death_registry
        .as_ref()
        .and_then(|o| o.stats())
        .cloned();
    let mortality_table = extracted
        .mortality_table
        .as_ref()
        .and_then(|o| o.stats())
        .cloned();

    let summary = Summary {
        roster_analyzed: roster.is_some(),
        death_registry_analyzed: death_registry.is_some(),
        mortality_table_analyzed: mortality_table.is_some(),
        total_formulas,
    };

    if !summary.any_analyzed() {
        warn!("{}", NO_DATA_WARNING);
        ledger.add_warning(NO_DATA_WARNING);
    }

    ConsolidatedStatistics {
        summary,
        roster,
        death_registry,
        mortality_table,
    }
}
