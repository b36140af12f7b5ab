//! Export Validator.
//!
//! Structural checks run before encoding. Error-severity findings block
//! export; warnings are reported alongside the graph.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::identity::IdentityRegistry;
use crate::types::{
    Benefit, BenefitValue, CanvasDocument, Direction, FindingKind, ValidationFinding,
    ValidationReport,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Validate a document.
pub fn validate(document: &CanvasDocument) -> ValidationReport {
    let mut validator = Validator {
        doc: document,
        known_persons: document.persons.iter().map(|p| p.id.as_str()).collect(),
        report: ValidationReport::default(),
    };
    validator.check_project();
    validator.check_tasks();
    validator.check_stakeholders();
    validator.check_governance();
    validator.check_outcomes();
    validator.check_identities();

    let report = validator.report;
    tracing::debug!(
        errors = report.errors().count(),
        warnings = report.warnings().count(),
        "Validation complete"
    );
    report
}

struct Validator<'a> {
    doc: &'a CanvasDocument,
    known_persons: HashSet<&'a str>,
    report: ValidationReport,
}

impl<'a> Validator<'a> {
    fn check_project(&mut self) {
        let doc = self.doc;
        let project = &doc.project;
        self.check_date("project.startDate", project.start_date.as_deref());
        self.check_date("project.endDate", project.end_date.as_deref());
        self.check_date("project.versionDate", project.version_date.as_deref());
        self.check_date("versionDate", doc.version_date.as_deref());
        self.check_order(
            "project",
            project.start_date.as_deref(),
            project.end_date.as_deref(),
        );
    }

    fn check_tasks(&mut self) {
        let doc = self.doc;
        for (ti, task) in doc.tasks().iter().enumerate() {
            let path = format!("userExpectations.requirements[{}]", ti);
            if task.title.trim().is_empty() {
                self.report.push(ValidationFinding::warning(
                    FindingKind::EmptyTitle,
                    path.clone(),
                    format!("Requirement '{}' has no title.", task.id),
                ));
            }
            for person_id in &task.stakeholders {
                self.check_person(&format!("{}.stakeholders", path), person_id);
            }
            for (bi, benefit) in task.benefits.iter().enumerate() {
                self.check_benefit(&format!("{}.benefits[{}]", path, bi), benefit);
            }
        }
    }

    fn check_benefit(&mut self, path: &str, benefit: &Benefit) {
        let label = if benefit.metric_id.is_empty() {
            benefit.kind.as_str()
        } else {
            benefit.metric_id.as_str()
        };

        match benefit.direction {
            None => self.report.push(ValidationFinding::error(
                FindingKind::MissingDirection,
                format!("{}.direction", path),
                format!("Benefit '{}' has no direction.", label),
            )),
            Some(direction) => {
                if direction.requires_target() && benefit.target.is_none() {
                    self.report.push(ValidationFinding::error(
                        FindingKind::MissingTarget,
                        format!("{}.target", path),
                        format!("Benefit '{}' is target-is-better but has no target value.", label),
                    ));
                }
                self.check_value_shape(path, label, direction, benefit);
            }
        }

        if benefit.value_meaning.is_none() {
            self.report.push(ValidationFinding::error(
                FindingKind::MissingValueMeaning,
                format!("{}.valueMeaning", path),
                format!("Benefit '{}' has no value meaning.", label),
            ));
        }

        if benefit.oversight_minutes_per_unit.is_some() && benefit.oversight_minutes_per_month.is_some() {
            self.report.push(ValidationFinding::warning(
                FindingKind::ConflictingOversight,
                path.to_string(),
                format!(
                    "Benefit '{}' sets oversight both per unit and per month; only one applies.",
                    label
                ),
            ));
        }
    }

    /// Binary values go with bool-is-better and nothing else; baseline and
    /// expected share a variant.
    fn check_value_shape(&mut self, path: &str, label: &str, direction: Direction, benefit: &Benefit) {
        let binary = |v: &BenefitValue| matches!(v, BenefitValue::Binary { .. });
        let consistent = match direction {
            Direction::BoolIsBetter => binary(&benefit.baseline) && binary(&benefit.expected),
            Direction::IncreaseIsBetter | Direction::DecreaseIsBetter | Direction::TargetIsBetter => {
                !binary(&benefit.baseline) && !binary(&benefit.expected)
            }
        };
        let same_variant = benefit.baseline.variant_name() == benefit.expected.variant_name();
        if !consistent || !same_variant {
            self.report.push(ValidationFinding::warning(
                FindingKind::ValueDirectionMismatch,
                path.to_string(),
                format!(
                    "Benefit '{}' has {} baseline and {} expected values, which do not fit its direction.",
                    label,
                    benefit.baseline.variant_name(),
                    benefit.expected.variant_name()
                ),
            ));
        }
    }

    fn check_stakeholders(&mut self) {
        let doc = self.doc;
        for (i, stakeholder) in doc.stakeholders().iter().enumerate() {
            let path = format!("userExpectations.stakeholders[{}]", i);
            self.check_person(&path, &stakeholder.person_id);
        }
    }

    fn check_governance(&mut self) {
        let doc = self.doc;
        let Some(governance) = &doc.governance else {
            return;
        };
        for (si, stage) in governance.stages.iter().enumerate() {
            let path = format!("governance.stages[{}]", si);
            self.check_date(&format!("{}.startDate", path), stage.start_date.as_deref());
            self.check_date(&format!("{}.endDate", path), stage.end_date.as_deref());
            self.check_order(&path, stage.start_date.as_deref(), stage.end_date.as_deref());
            for (ai, agent) in stage.agents.iter().enumerate() {
                if let Some(person_id) = &agent.person_id {
                    self.check_person(&format!("{}.agents[{}]", path, ai), person_id);
                }
            }
        }
    }

    fn check_outcomes(&mut self) {
        let doc = self.doc;
        let Some(outcomes) = &doc.outcomes else {
            return;
        };
        for (i, d) in outcomes.deliverables.iter().enumerate() {
            self.check_date(&format!("outcomes.deliverables[{}].date", i), d.date.as_deref());
        }
        for (i, p) in outcomes.publications.iter().enumerate() {
            self.check_date(&format!("outcomes.publications[{}].date", i), p.date.as_deref());
        }
        for (i, e) in outcomes.evaluations.iter().enumerate() {
            self.check_date(&format!("outcomes.evaluations[{}].date", i), e.date.as_deref());
        }
    }

    fn check_identities(&mut self) {
        let mut registry = IdentityRegistry::new();
        let doc = self.doc;
        for person in &doc.persons {
            registry.register_person(person);
        }
        for finding in registry.validate() {
            self.report.push(finding);
        }
    }

    fn check_person(&mut self, path: &str, person_id: &str) {
        if !self.known_persons.contains(person_id) {
            self.report.push(ValidationFinding::warning(
                FindingKind::UnknownPerson,
                path.to_string(),
                format!("Person '{}' is not in the person list and will be left out.", person_id),
            ));
        }
    }

    fn check_date(&mut self, path: &str, value: Option<&str>) {
        let Some(value) = value.filter(|v| !v.is_empty()) else {
            return;
        };
        if parse_date(value).is_none() {
            self.report.push(ValidationFinding::warning(
                FindingKind::InvalidDate,
                path.to_string(),
                format!("'{}' is not a YYYY-MM-DD date.", value),
            ));
        }
    }

    fn check_order(&mut self, path: &str, start: Option<&str>, end: Option<&str>) {
        if let (Some(start), Some(end)) = (start.and_then(parse_date), end.and_then(parse_date)) {
            if end < start {
                self.report.push(ValidationFinding::warning(
                    FindingKind::InvalidDate,
                    path.to_string(),
                    format!("End date {} is before start date {}.", end, start),
                ));
            }
        }
    }
}

/// Parse the date part of an ISO date or date-time.
fn parse_date(value: &str) -> Option<NaiveDate> {
    let date = value.split('T').next().unwrap_or(value);
    NaiveDate::parse_from_str(date, DATE_FORMAT).ok()
}
