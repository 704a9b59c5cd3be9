//! Column-role inference from header text.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::schema::{role_rules, ColumnRole, RoleRule, SheetType};
use crate::text::fold;

/// Role → header assignment for one sheet; `None` marks an unresolved role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnRoleMap(IndexMap<ColumnRole, Option<String>>);

impl ColumnRoleMap {
    /// Header assigned to a role, if any.
    pub fn get(&self, role: ColumnRole) -> Option<&str> {
        self.0.get(&role).and_then(|h| h.as_deref())
    }

    /// Whether the role is part of this map and was resolved.
    pub fn is_resolved(&self, role: ColumnRole) -> bool {
        self.get(role).is_some()
    }

    /// Resolved (role, header) pairs in rule order.
    pub fn resolved(&self) -> impl Iterator<Item = (ColumnRole, &str)> {
        self.0
            .iter()
            .filter_map(|(role, header)| header.as_deref().map(|h| (*role, h)))
    }

    /// Headers of every resolved role.
    pub fn resolved_headers(&self) -> Vec<&str> {
        self.resolved().map(|(_, h)| h).collect()
    }

    /// Roles that no header matched.
    pub fn unresolved(&self) -> Vec<ColumnRole> {
        self.0
            .iter()
            .filter(|(_, h)| h.is_none())
            .map(|(role, _)| *role)
            .collect()
    }

    /// Every role this map covers, in rule order.
    pub fn roles(&self) -> impl Iterator<Item = ColumnRole> + '_ {
        self.0.keys().copied()
    }
}

/// Resolves which header plays which role for one sheet type.
pub struct ColumnRoleResolver {
    rules: &'static [RoleRule],
}

impl ColumnRoleResolver {
    /// Create a resolver using the built-in rule table for a sheet type.
    pub fn new(sheet_type: SheetType) -> Self {
        Self {
            rules: role_rules(sheet_type),
        }
    }

    /// Assign headers to roles.
    ///
    /// Each header goes to the first rule it matches whose role is still
    /// unfilled; a filled role is never reassigned.
    pub fn resolve<S: AsRef<str>>(&self, headers: &[S]) -> ColumnRoleMap {
        let mut map: IndexMap<ColumnRole, Option<String>> =
            self.rules.iter().map(|rule| (rule.role, None)).collect();

        for header in headers {
            let header = header.as_ref();
            let folded = fold(header);
            if folded.is_empty() {
                continue;
            }

            let target = self
                .rules
                .iter()
                .find(|rule| map[&rule.role].is_none() && rule.matches(&folded));

            if let Some(rule) = target {
                map.insert(rule.role, Some(header.to_string()));
            }
        }

        ColumnRoleMap(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_roles() {
        let resolver = ColumnRoleResolver::new(SheetType::Roster);
        let map = resolver.resolve(&[
            "Matrícula",
            "Nome",
            "Sexo",
            "Data Nascimento",
            "Idade",
            "Salário",
        ]);

        assert_eq!(map.get(ColumnRole::Id), Some("Matrícula"));
        assert_eq!(map.get(ColumnRole::Name), Some("Nome"));
        assert_eq!(map.get(ColumnRole::Sex), Some("Sexo"));
        assert_eq!(map.get(ColumnRole::BirthDate), Some("Data Nascimento"));
        assert_eq!(map.get(ColumnRole::Age), Some("Idade"));
        assert_eq!(map.get(ColumnRole::Salary), Some("Salário"));
        assert!(map.unresolved().is_empty());
    }

    #[test]
    fn test_first_header_wins_role() {
        let resolver = ColumnRoleResolver::new(SheetType::Roster);
        let map = resolver.resolve(&["IDADE", "IDADE ATUAL"]);
        assert_eq!(map.get(ColumnRole::Age), Some("IDADE"));
    }

    #[test]
    fn test_filled_role_falls_through_to_next_match() {
        // "Valor Nome" matches salary first; once salary is taken it can
        // still fill the name role.
        let resolver = ColumnRoleResolver::new(SheetType::Roster);
        let map = resolver.resolve(&["Valor", "Valor Nome"]);
        assert_eq!(map.get(ColumnRole::Salary), Some("Valor"));
        assert_eq!(map.get(ColumnRole::Name), Some("Valor Nome"));
    }

    #[test]
    fn test_mortality_table_roles() {
        let resolver = ColumnRoleResolver::new(SheetType::MortalityTable);
        let map = resolver.resolve(&["IDADE", "QX MASCULINO", "QX FEMININO"]);

        assert_eq!(map.get(ColumnRole::Age), Some("IDADE"));
        assert_eq!(map.get(ColumnRole::QxMale), Some("QX MASCULINO"));
        assert_eq!(map.get(ColumnRole::QxFemale), Some("QX FEMININO"));
        assert_eq!(map.get(ColumnRole::QxOverall), None);
        assert_eq!(map.unresolved(), vec![ColumnRole::QxOverall]);
    }

    #[test]
    fn test_qx_columns_before_age_column() {
        let resolver = ColumnRoleResolver::new(SheetType::MortalityTable);
        let map = resolver.resolve(&["qx", "x"]);
        assert_eq!(map.get(ColumnRole::QxOverall), Some("qx"));
        assert_eq!(map.get(ColumnRole::Age), Some("x"));
    }

    #[test]
    fn test_death_registry_roles() {
        let resolver = ColumnRoleResolver::new(SheetType::DeathRegistry);
        let map = resolver.resolve(&[
            "CPF",
            "Data Nascimento",
            "Idade Óbito",
            "Data do Óbito",
            "Sexo",
            "Causa",
        ]);

        assert_eq!(map.get(ColumnRole::Id), Some("CPF"));
        assert_eq!(map.get(ColumnRole::DeathAge), Some("Idade Óbito"));
        assert_eq!(map.get(ColumnRole::DeathDate), Some("Data do Óbito"));
        assert_eq!(map.get(ColumnRole::Sex), Some("Sexo"));
        assert_eq!(map.get(ColumnRole::Cause), Some("Causa"));
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let resolver = ColumnRoleResolver::new(SheetType::Roster);
        let headers = ["IDADE", "SEXO", "col_3"];
        assert_eq!(resolver.resolve(&headers), resolver.resolve(&headers));
    }

    #[test]
    fn test_unclassified_has_no_roles() {
        let resolver = ColumnRoleResolver::new(SheetType::Unclassified);
        let map = resolver.resolve(&["IDADE"]);
        assert_eq!(map.roles().count(), 0);
    }
}
