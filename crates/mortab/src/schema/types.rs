//! Core type definitions for sheet subjects and column roles.

use serde::{Deserialize, Serialize};

/// Subject of a worksheet, inferred from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetType {
    /// Population/participant base (one row per living member).
    Roster,
    /// Recorded deaths.
    DeathRegistry,
    /// Age-indexed probability-of-death table.
    MortalityTable,
    /// No keyword matched.
    Unclassified,
}

impl SheetType {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            SheetType::Roster => "Roster",
            SheetType::DeathRegistry => "Death Registry",
            SheetType::MortalityTable => "Mortality Table",
            SheetType::Unclassified => "Unclassified",
        }
    }
}

/// Semantic role a column can play within a sheet type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    // Roster
    Age,
    Sex,
    BirthDate,
    Salary,
    Name,
    Id,
    // Death registry
    DeathAge,
    DeathDate,
    Cause,
    // Mortality table
    QxMale,
    QxFemale,
    QxOverall,
}

impl ColumnRole {
    /// Snake-case name as it appears in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnRole::Age => "age",
            ColumnRole::Sex => "sex",
            ColumnRole::BirthDate => "birth_date",
            ColumnRole::Salary => "salary",
            ColumnRole::Name => "name",
            ColumnRole::Id => "id",
            ColumnRole::DeathAge => "death_age",
            ColumnRole::DeathDate => "death_date",
            ColumnRole::Cause => "cause",
            ColumnRole::QxMale => "qx_male",
            ColumnRole::QxFemale => "qx_female",
            ColumnRole::QxOverall => "qx_overall",
        }
    }
}
