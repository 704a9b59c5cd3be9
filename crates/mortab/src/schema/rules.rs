//! Keyword rule tables for sheet classification and column-role matching.
//!
//! The tables are plain data evaluated top to bottom; adding a role or a
//! keyword means adding an entry, never new matching code. All matching runs
//! against labels folded by [`crate::text::fold`].

use super::types::{ColumnRole, SheetType};
use crate::text::tokens;

/// A single keyword test against a folded label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    /// Matches when the label contains the text anywhere.
    Contains(&'static str),
    /// Matches when one alphanumeric token of the label equals the text.
    Token(&'static str),
}

impl Keyword {
    pub fn matches(&self, folded: &str) -> bool {
        match self {
            Keyword::Contains(k) => folded.contains(k),
            Keyword::Token(k) => tokens(folded).any(|t| t == *k),
        }
    }
}

fn any_match(keywords: &[Keyword], folded: &str) -> bool {
    keywords.iter().any(|k| k.matches(folded))
}

/// Maps headers to one role.
#[derive(Debug, Clone, Copy)]
pub struct RoleRule {
    pub role: ColumnRole,
    /// At least one must match.
    pub any_of: &'static [Keyword],
    /// When non-empty, at least one must also match.
    pub and_any_of: &'static [Keyword],
    /// None may match.
    pub none_of: &'static [Keyword],
}

impl RoleRule {
    pub fn matches(&self, folded: &str) -> bool {
        any_match(self.any_of, folded)
            && (self.and_any_of.is_empty() || any_match(self.and_any_of, folded))
            && !any_match(self.none_of, folded)
    }
}

/// Maps sheet names to one sheet type.
#[derive(Debug, Clone, Copy)]
pub struct SheetRule {
    pub sheet_type: SheetType,
    pub keywords: &'static [Keyword],
}

use Keyword::{Contains, Token};

/// Sheet classification in priority order.
pub static SHEET_RULES: &[SheetRule] = &[
    SheetRule {
        sheet_type: SheetType::Roster,
        keywords: &[
            Contains("massa"),
            Contains("participante"),
            Contains("trabalhada"),
            Contains("unificada"),
        ],
    },
    SheetRule {
        sheet_type: SheetType::DeathRegistry,
        keywords: &[
            Contains("obito"),
            Contains("morte"),
            Contains("falecimento"),
            Contains("death"),
        ],
    },
    SheetRule {
        sheet_type: SheetType::MortalityTable,
        keywords: &[Contains("qx"), Contains("mortalidade"), Contains("taxa")],
    },
];

const NONE: &[Keyword] = &[];

const ID: &[Keyword] = &[
    Contains("cpf"),
    Contains("documento"),
    Contains("matricula"),
    Token("id"),
];

const SEX: &[Keyword] = &[
    Contains("sexo"),
    Contains("sex"),
    Contains("genero"),
    Contains("gender"),
];

const BIRTH: &[Keyword] = &[
    Contains("nascimento"),
    Contains("birth"),
    Contains("data_nasc"),
    Contains("dt_nasc"),
];

const QX: &[Keyword] = &[Contains("qx"), Contains("q(x)"), Contains("taxa")];

const MALE: &[Keyword] = &[
    Contains("masc"),
    Contains("male"),
    Contains("homem"),
    Token("m"),
];

// "female" contains "male"; exclusions use the markers that cannot collide.
const MALE_ONLY: &[Keyword] = &[Contains("masc"), Contains("homem"), Token("m")];

const FEMALE: &[Keyword] = &[Contains("fem"), Contains("mulher"), Token("f")];

const SEXED: &[Keyword] = &[
    Contains("masc"),
    Contains("male"),
    Contains("homem"),
    Token("m"),
    Contains("fem"),
    Contains("mulher"),
    Token("f"),
];

/// Roster roles in evaluation order.
pub static ROSTER_RULES: &[RoleRule] = &[
    RoleRule {
        role: ColumnRole::Age,
        any_of: &[Contains("idade"), Contains("age"), Contains("anos")],
        and_any_of: NONE,
        none_of: NONE,
    },
    RoleRule {
        role: ColumnRole::Sex,
        any_of: SEX,
        and_any_of: NONE,
        none_of: NONE,
    },
    RoleRule {
        role: ColumnRole::BirthDate,
        any_of: BIRTH,
        and_any_of: NONE,
        none_of: NONE,
    },
    RoleRule {
        role: ColumnRole::Salary,
        any_of: &[
            Contains("salario"),
            Contains("salary"),
            Contains("remuneracao"),
            Contains("valor"),
        ],
        and_any_of: NONE,
        none_of: NONE,
    },
    RoleRule {
        role: ColumnRole::Name,
        any_of: &[Contains("nome"), Contains("name"), Contains("participante")],
        and_any_of: NONE,
        none_of: NONE,
    },
    RoleRule {
        role: ColumnRole::Id,
        any_of: ID,
        and_any_of: NONE,
        none_of: NONE,
    },
];

/// Death-registry roles in evaluation order.
pub static DEATH_REGISTRY_RULES: &[RoleRule] = &[
    RoleRule {
        role: ColumnRole::DeathAge,
        any_of: &[Contains("idade"), Contains("age")],
        and_any_of: NONE,
        none_of: NONE,
    },
    RoleRule {
        role: ColumnRole::Sex,
        any_of: SEX,
        and_any_of: NONE,
        none_of: NONE,
    },
    RoleRule {
        role: ColumnRole::DeathDate,
        any_of: &[
            Contains("data"),
            Contains("obito"),
            Contains("death"),
            Contains("falecimento"),
        ],
        and_any_of: NONE,
        none_of: BIRTH,
    },
    RoleRule {
        role: ColumnRole::Cause,
        any_of: &[
            Contains("causa"),
            Contains("cause"),
            Contains("motivo"),
            Contains("reason"),
        ],
        and_any_of: NONE,
        none_of: NONE,
    },
    RoleRule {
        role: ColumnRole::Id,
        any_of: ID,
        and_any_of: NONE,
        none_of: NONE,
    },
];

/// Mortality-table roles in evaluation order.
pub static MORTALITY_TABLE_RULES: &[RoleRule] = &[
    RoleRule {
        role: ColumnRole::Age,
        any_of: &[Contains("idade"), Contains("age"), Token("x")],
        and_any_of: NONE,
        none_of: QX,
    },
    RoleRule {
        role: ColumnRole::QxMale,
        any_of: QX,
        and_any_of: MALE,
        none_of: FEMALE,
    },
    RoleRule {
        role: ColumnRole::QxFemale,
        any_of: QX,
        and_any_of: FEMALE,
        none_of: MALE_ONLY,
    },
    RoleRule {
        role: ColumnRole::QxOverall,
        any_of: QX,
        and_any_of: NONE,
        none_of: SEXED,
    },
];

/// Rule table for a sheet type (empty for unclassified sheets).
pub fn role_rules(sheet_type: SheetType) -> &'static [RoleRule] {
    match sheet_type {
        SheetType::Roster => ROSTER_RULES,
        SheetType::DeathRegistry => DEATH_REGISTRY_RULES,
        SheetType::MortalityTable => MORTALITY_TABLE_RULES,
        SheetType::Unclassified => &[],
    }
}
