//! Export validation findings and migration warnings.
//!
//! | Severity | Effect on export |
//! |----------|------------------|
//! | `Error`  | Export refused, findings returned |
//! | `Warning`| Reported, export proceeds |

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational; does not block export.
    Warning,
    /// Blocks export.
    Error,
}

impl Severity {
    /// Check if this severity blocks export.
    pub fn blocks_export(&self) -> bool {
        matches!(self, Self::Error)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// What a finding is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// Benefit has no direction.
    MissingDirection,
    /// Benefit has no value meaning.
    MissingValueMeaning,
    /// Target-is-better benefit has no target.
    MissingTarget,
    /// Both oversight fields are set on one benefit.
    ConflictingOversight,
    /// Value variant does not fit the direction.
    ValueDirectionMismatch,
    /// Task has no title.
    EmptyTitle,
    /// Reference to a person id that is not in the document.
    UnknownPerson,
    /// Two or more persons share a name with no disambiguating evidence.
    AmbiguousIdentity,
    /// A date field is not ISO `YYYY-MM-DD`.
    InvalidDate,
}

/// One validation finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationFinding {
    /// Severity.
    pub severity: Severity,
    /// Category.
    pub kind: FindingKind,
    /// Document path, e.g. `userExpectations.requirements[0].benefits[1]`.
    pub path: String,
    /// Human-readable message.
    pub message: String,
}

impl ValidationFinding {
    /// Create an error-severity finding.
    pub fn error(kind: FindingKind, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            kind,
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a warning-severity finding.
    pub fn warning(kind: FindingKind, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.path, self.message)
    }
}

/// All findings of one validation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Findings in discovery order.
    pub findings: Vec<ValidationFinding>,
}

impl ValidationReport {
    /// Append a finding.
    pub fn push(&mut self, finding: ValidationFinding) {
        self.findings.push(finding);
    }

    /// Whether any finding blocks export.
    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(|f| f.severity.blocks_export())
    }

    /// Error-severity findings.
    pub fn errors(&self) -> impl Iterator<Item = &ValidationFinding> {
        self.findings.iter().filter(|f| f.severity == Severity::Error)
    }

    /// Warning-severity findings.
    pub fn warnings(&self) -> impl Iterator<Item = &ValidationFinding> {
        self.findings.iter().filter(|f| f.severity == Severity::Warning)
    }

    /// Whether there are no findings at all.
    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }
}

/// Category of a migration warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationKind {
    /// Description promoted to title.
    TitlePromoted,
    /// Historical unit categories remapped.
    UnitCategoryRemapped,
    /// Unknown unit categories replaced with `other`.
    UnitCategoryUnmapped,
    /// Task-level oversight dropped for lack of a target benefit.
    OversightDropped,
    /// Primary value driver cleared.
    ValueDriverCleared,
    /// Local title list joined.
    LocalTitlesCollapsed,
    /// Crate written by a different schema version.
    SchemaVersionMismatch,
}

/// Informational note produced while normalizing an older document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationWarning {
    /// Category.
    pub kind: MigrationKind,
    /// Human-readable message.
    pub message: String,
}

impl MigrationWarning {
    /// Create a new warning.
    pub fn new(kind: MigrationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for MigrationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_blocks_only_on_error() {
        let mut report = ValidationReport::default();
        report.push(ValidationFinding::warning(FindingKind::EmptyTitle, "t", "no title"));
        assert!(!report.has_errors());

        report.push(ValidationFinding::error(FindingKind::MissingTarget, "b", "no target"));
        assert!(report.has_errors());
        assert_eq!(report.errors().count(), 1);
        assert_eq!(report.warnings().count(), 1);
    }

    #[test]
    fn test_finding_display() {
        let f = ValidationFinding::error(FindingKind::MissingDirection, "requirements[0].benefits[0]", "direction is required");
        assert_eq!(f.to_string(), "[ERROR] requirements[0].benefits[0]: direction is required");
    }
}
