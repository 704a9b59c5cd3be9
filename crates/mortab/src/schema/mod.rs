//! Sheet subjects, column roles, and the keyword tables that infer them.

mod rules;
mod types;

pub use rules::{
    role_rules, Keyword, RoleRule, SheetRule, DEATH_REGISTRY_RULES, MORTALITY_TABLE_RULES,
    ROSTER_RULES, SHEET_RULES,
};
pub use types::{ColumnRole, SheetType};
