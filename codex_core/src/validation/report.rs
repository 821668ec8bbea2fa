//! Validation findings.

use serde::{Deserialize, Serialize};

/// Which check produced an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Check {
    NodeGates,
    GateRange,
    MembershipFormula,
    MembershipInverse,
    CatalogGates,
    EmptyGate,
    DeclaredHarmonics,
    ArcanaBijection,
    PathEndpoints,
    TreeCorrespondence,
    AffinitySymmetry,
    AffinityExclusive,
    CrossReference,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub check: Check,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(check: Check, message: impl Into<String>) -> Self {
        Self {
            check,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.check, self.message)
    }
}

/// Outcome of a validation run.
///
/// `errors` are broken invariants; `warnings` are gaps that break none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub(crate) fn new() -> Self {
        Self {
            valid: true,
            ..Default::default()
        }
    }

    pub(crate) fn error(&mut self, check: Check, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(ValidationIssue::new(check, message));
    }

    pub(crate) fn warn(&mut self, check: Check, message: impl Into<String>) {
        self.warnings.push(ValidationIssue::new(check, message));
    }

    /// Errors raised by one check.
    pub fn errors_for(&self, check: Check) -> Vec<&ValidationIssue> {
        self.errors.iter().filter(|i| i.check == check).collect()
    }

    /// Warnings raised by one check.
    pub fn warnings_for(&self, check: Check) -> Vec<&ValidationIssue> {
        self.warnings.iter().filter(|i| i.check == check).collect()
    }

    /// Pretty JSON for tooling.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_marks_invalid() {
        let mut report = ValidationReport::new();
        assert!(report.valid);

        report.warn(Check::EmptyGate, "gate 99 has no members");
        assert!(report.valid);

        report.error(Check::ArcanaBijection, "arcana 3 is used twice");
        assert!(!report.valid);
        assert_eq!(report.errors_for(Check::ArcanaBijection).len(), 1);
        assert!(report.errors_for(Check::EmptyGate).is_empty());
        assert_eq!(report.warnings_for(Check::EmptyGate).len(), 1);
    }

    #[test]
    fn test_to_json() {
        let mut report = ValidationReport::new();
        report.error(Check::NodeGates, "node 5 has no gates");

        let json = report.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["valid"], false);
        assert_eq!(value["errors"][0]["check"], "node_gates");
    }
}
