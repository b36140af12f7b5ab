//! Schema Normalizer.
//!
//! Maps older document shapes onto the current one in a single pass and
//! reports what it changed. Never fails; the input is left untouched.
//!
//! | Transform | Warning |
//! |-----------|---------|
//! | empty task title ← description | one per document, with a count |
//! | historical unit category → current | one aggregate count |
//! | unknown unit category → `other` | one, listing the original values |
//! | task-level oversight → first time benefit | one aggregate count of drops |
//! | unknown primary value driver → cleared | one per document, naming the value |
//! | person local-title list → single title | one aggregate count |

use crate::types::{
    AggregationBasis, BenefitKind, CanvasDocument, Lenient, MigrationKind, MigrationWarning, Task,
    UnitCategory,
};

/// Normalize a document. Returns the new document and the migration warnings.
pub fn normalize(document: &CanvasDocument) -> (CanvasDocument, Vec<MigrationWarning>) {
    let mut doc = document.clone();
    let mut warnings = Vec::new();

    if let Some(expectations) = doc.user_expectations.as_mut() {
        let tasks = &mut expectations.requirements;
        promote_titles(tasks, &mut warnings);
        remap_unit_categories(tasks, &mut warnings);
        relocate_oversight(tasks, &mut warnings);
    }
    sanitize_value_driver(&mut doc, &mut warnings);
    collapse_local_titles(&mut doc, &mut warnings);

    for w in &warnings {
        tracing::debug!(kind = ?w.kind, message = %w.message, "Migration applied");
    }
    (doc, warnings)
}

fn promote_titles(tasks: &mut [Task], warnings: &mut Vec<MigrationWarning>) {
    let mut promoted = 0usize;
    for task in tasks.iter_mut() {
        if !task.title.trim().is_empty() {
            continue;
        }
        if let Some(description) = task.description.take() {
            if description.trim().is_empty() {
                task.description = Some(description);
                continue;
            }
            task.title = description.trim().to_string();
            promoted += 1;
        }
    }
    if promoted > 0 {
        warnings.push(MigrationWarning::new(
            MigrationKind::TitlePromoted,
            format!("{} requirement(s) had description used as title.", promoted),
        ));
    }
}

fn remap_unit_categories(tasks: &mut [Task], warnings: &mut Vec<MigrationWarning>) {
    let mut remapped = 0usize;
    let mut unmapped: Vec<String> = Vec::new();

    for task in tasks.iter_mut() {
        let Some(Lenient::Unrecognized(raw)) = &task.unit_category else {
            continue;
        };
        let folded = raw.trim().to_lowercase();
        let mapped = UnitCategory::from_historical(raw.trim())
            .or_else(|| UnitCategory::from_str(&folded))
            .or_else(|| UnitCategory::from_historical(&folded));
        match mapped {
            Some(category) => {
                remapped += 1;
                task.unit_category = Some(Lenient::Known(category));
            }
            None => {
                if !unmapped.contains(raw) {
                    unmapped.push(raw.clone());
                }
                task.unit_category = Some(Lenient::Known(UnitCategory::Other));
            }
        }
    }

    if remapped > 0 {
        warnings.push(MigrationWarning::new(
            MigrationKind::UnitCategoryRemapped,
            format!(
                "{} unit category/categories mapped to new values (item, interaction, computation, other).",
                remapped
            ),
        ));
    }
    if !unmapped.is_empty() {
        warnings.push(MigrationWarning::new(
            MigrationKind::UnitCategoryUnmapped,
            format!(
                "Unmapped unit categories dropped (set to 'other'): {}.",
                unmapped.join(", ")
            ),
        ));
    }
}

/// Move task-level oversight onto the first time benefit.
///
/// Per-unit benefits take the value as is; per-month benefits take it scaled
/// by monthly volume. Existing benefit-level values are never overwritten.
fn relocate_oversight(tasks: &mut [Task], warnings: &mut Vec<MigrationWarning>) {
    let mut dropped = 0usize;
    for task in tasks.iter_mut() {
        let Some(minutes) = task.human_oversight_minutes_per_unit.take() else {
            continue;
        };
        let volume = task.volume_per_month;
        let Some(idx) = task.first_time_benefit() else {
            dropped += 1;
            continue;
        };
        let benefit = &mut task.benefits[idx];
        let already_set =
            benefit.oversight_minutes_per_unit.is_some() || benefit.oversight_minutes_per_month.is_some();
        let placed = match (benefit.basis(), volume) {
            _ if already_set => false,
            (AggregationBasis::PerUnit, _) => {
                benefit.oversight_minutes_per_unit = Some(minutes);
                true
            }
            (AggregationBasis::PerMonth, Some(volume)) => {
                benefit.oversight_minutes_per_month = Some(minutes * volume);
                true
            }
            (AggregationBasis::PerMonth, None) | (AggregationBasis::OneOff, _) => false,
        };
        if !placed {
            dropped += 1;
        }
    }
    if dropped > 0 {
        warnings.push(MigrationWarning::new(
            MigrationKind::OversightDropped,
            format!(
                "{} task-level human oversight value(s) could not be attached to a time benefit and were dropped.",
                dropped
            ),
        ));
    }
}

fn sanitize_value_driver(doc: &mut CanvasDocument, warnings: &mut Vec<MigrationWarning>) {
    let Some(Lenient::Unrecognized(raw)) = &doc.project.primary_value_driver else {
        return;
    };
    match BenefitKind::from_str(&raw.to_lowercase()) {
        Some(kind) => doc.project.primary_value_driver = Some(Lenient::Known(kind)),
        None => {
            warnings.push(MigrationWarning::new(
                MigrationKind::ValueDriverCleared,
                format!(
                    "Project primaryValueDriver '{}' is not in current schema; field cleared.",
                    raw
                ),
            ));
            doc.project.primary_value_driver = None;
        }
    }
}

fn collapse_local_titles(doc: &mut CanvasDocument, warnings: &mut Vec<MigrationWarning>) {
    let mut collapsed = 0usize;
    for person in doc.persons.iter_mut() {
        let Some(titles) = person.local_titles.take() else {
            continue;
        };
        let mut parts: Vec<String> = person
            .local_title
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        for title in titles {
            let title = title.trim().to_string();
            if !title.is_empty() && !parts.contains(&title) {
                parts.push(title);
            }
        }
        person.local_title = if parts.is_empty() { None } else { Some(parts.join(", ")) };
        collapsed += 1;
    }
    if collapsed > 0 {
        warnings.push(MigrationWarning::new(
            MigrationKind::LocalTitlesCollapsed,
            format!("{} person(s) had a local title list joined into one title.", collapsed),
        ));
    }
}
