//! Append-only validation ledger.

use serde::{Deserialize, Serialize};

/// Errors and warnings accumulated during one run.
///
/// Entries are only ever appended. `integrity_ok` starts true and turns false
/// with the first error; nothing resets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationLedger {
    errors: Vec<String>,
    warnings: Vec<String>,
    integrity_ok: bool,
}

impl ValidationLedger {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            integrity_ok: true,
        }
    }

    /// Append an error and mark the run as failing integrity.
    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.integrity_ok = false;
    }

    /// Append an advisory warning; integrity is unaffected.
    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn integrity_ok(&self) -> bool {
        self.integrity_ok
    }
}

impl Default for ValidationLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_clean() {
        let ledger = ValidationLedger::new();
        assert!(ledger.integrity_ok());
        assert!(ledger.errors().is_empty());
        assert!(ledger.warnings().is_empty());
    }

    #[test]
    fn test_warnings_keep_integrity() {
        let mut ledger = ValidationLedger::new();
        ledger.add_warning("no specific data was extracted");
        assert!(ledger.integrity_ok());
        assert_eq!(ledger.warnings(), ["no specific data was extracted"]);
    }

    #[test]
    fn test_error_flips_integrity_for_good() {
        let mut ledger = ValidationLedger::new();
        ledger.add_error("first");
        ledger.add_warning("later warning");
        ledger.add_error("second");

        assert!(!ledger.integrity_ok());
        assert_eq!(ledger.errors(), ["first", "second"]);
    }

    #[test]
    fn test_serialized_shape() {
        let mut ledger = ValidationLedger::new();
        ledger.add_warning("w");
        let json = serde_json::to_value(&ledger).unwrap();
        assert_eq!(json["errors"], serde_json::json!([]));
        assert_eq!(json["warnings"], serde_json::json!(["w"]));
        assert_eq!(json["integrity_ok"], true);
    }
}
