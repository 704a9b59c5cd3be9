//! Sheet classification by name.

use crate::schema::{SheetType, SHEET_RULES};
use crate::text::fold;

/// Classify a sheet by case- and accent-insensitive keyword search.
///
/// Rules are tried in priority order roster → death registry → mortality
/// table; the first hit wins and anything else is unclassified.
pub fn sheet_type(name: &str) -> SheetType {
    let folded = fold(name);
    SHEET_RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| k.matches(&folded)))
        .map(|rule| rule.sheet_type)
        .unwrap_or(SheetType::Unclassified)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_names() {
        assert_eq!(sheet_type("Massa Unificada"), SheetType::Roster);
        assert_eq!(sheet_type("PARTICIPANTES ATIVOS"), SheetType::Roster);
        assert_eq!(sheet_type("base trabalhada"), SheetType::Roster);
    }

    #[test]
    fn test_death_registry_names() {
        assert_eq!(sheet_type("Óbitos 2019-2024"), SheetType::DeathRegistry);
        assert_eq!(sheet_type("deaths"), SheetType::DeathRegistry);
        assert_eq!(sheet_type("Falecimentos"), SheetType::DeathRegistry);
    }

    #[test]
    fn test_mortality_table_names() {
        assert_eq!(sheet_type("qx masc e fem"), SheetType::MortalityTable);
        assert_eq!(sheet_type("Tábua de Mortalidade"), SheetType::MortalityTable);
        assert_eq!(sheet_type("TAXAS"), SheetType::MortalityTable);
    }

    #[test]
    fn test_priority_order() {
        // Matches both roster ("massa") and mortality table ("qx").
        assert_eq!(sheet_type("Massa qx"), SheetType::Roster);
        // Matches both death registry ("obito") and mortality table ("taxa").
        assert_eq!(sheet_type("taxa de obito"), SheetType::DeathRegistry);
    }

    #[test]
    fn test_unclassified() {
        assert_eq!(sheet_type("Resumo"), SheetType::Unclassified);
        assert_eq!(sheet_type(""), SheetType::Unclassified);
    }
}
