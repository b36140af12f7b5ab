//! Export and import wiring.
//!
//! ```text
//! export: document → validate → encode → container (+ side files)
//! import: container (+ side files) → decode → normalize → document
//! ```

use std::collections::HashMap;

use serde_json::Value;

use crate::config::EncodeOptions;
use crate::decoder::decode_crate;
use crate::encoder::{encode, SideFile};
use crate::error::{DecodeError, ExportRefused};
use crate::graph::GraphContainer;
use crate::normalize::normalize;
use crate::types::{
    CanvasDocument, DisplayState, MigrationKind, MigrationWarning, ValidationReport,
};
use crate::validate::validate;
use crate::CANVAS_SCHEMA_VERSION;

/// Result of a successful export.
#[derive(Debug, Clone)]
pub struct ExportOutput {
    /// The encoded graph.
    pub container: GraphContainer,
    /// Warning-severity findings, including identity ambiguity from encoding.
    pub report: ValidationReport,
    /// Side payloads to package next to the graph (files mode only).
    pub side_files: Vec<SideFile>,
}

/// Result of an import.
#[derive(Debug, Clone)]
pub struct ImportOutput {
    /// The normalized document.
    pub document: CanvasDocument,
    /// Migration warnings from normalization and the schema-version check.
    pub warnings: Vec<MigrationWarning>,
    /// Display-group state, if the crate carried one.
    pub display_state: Option<DisplayState>,
    /// Schema version recorded in the crate.
    pub schema_version: Option<String>,
}

/// Validate and encode a document.
///
/// Refuses to encode when validation finds an error; the refusal carries
/// the full report.
pub fn export_document(
    document: &CanvasDocument,
    options: &EncodeOptions,
) -> Result<ExportOutput, ExportRefused> {
    let mut report = validate(document);
    if report.has_errors() {
        tracing::warn!(
            errors = report.errors().count(),
            warnings = report.warnings().count(),
            "Export refused"
        );
        return Err(ExportRefused { findings: report });
    }

    let encoded = encode(document, options);
    for finding in encoded.identity_findings {
        if !report.findings.contains(&finding) {
            report.push(finding);
        }
    }

    Ok(ExportOutput {
        container: encoded.container,
        report,
        side_files: encoded.side_files,
    })
}

/// Decode and normalize a container.
pub fn import_container(
    container: &GraphContainer,
    side_files: &HashMap<String, Value>,
) -> Result<ImportOutput, DecodeError> {
    let decoded = decode_crate(container, side_files)?;
    let (document, mut warnings) = normalize(&decoded.document);

    if let Some(version) = decoded.schema_version.as_deref() {
        if version != CANVAS_SCHEMA_VERSION {
            warnings.push(MigrationWarning::new(
                MigrationKind::SchemaVersionMismatch,
                format!(
                    "Crate schema version {} differs from current {}; fields were migrated where possible.",
                    version, CANVAS_SCHEMA_VERSION
                ),
            ));
        }
    }

    tracing::info!(
        tasks = document.tasks().len(),
        warnings = warnings.len(),
        "Import complete"
    );

    Ok(ImportOutput {
        document,
        warnings,
        display_state: decoded.display_state,
        schema_version: decoded.schema_version,
    })
}

/// Parse crate metadata JSON and import it without side files.
pub fn import_json(text: &str) -> Result<ImportOutput, DecodeError> {
    let container = GraphContainer::from_json(text)?;
    import_container(&container, &HashMap::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CodecConfig;
    use crate::types::{Benefit, BenefitKind, Direction, FindingKind, Task};

    fn options() -> EncodeOptions {
        EncodeOptions::new(CodecConfig::default()).with_schema_version(CANVAS_SCHEMA_VERSION)
    }

    #[test]
    fn test_refused_export_returns_findings() {
        let mut doc = CanvasDocument::new("P", "");
        doc.tasks_mut().push(Task::new("t1", "Score").with_benefit(Benefit::numeric(
            BenefitKind::Quality,
            "accuracy",
            Direction::TargetIsBetter,
            70.0,
            90.0,
        )));

        let refused = export_document(&doc, &options()).unwrap_err();
        assert_eq!(refused.findings.errors().count(), 1);
        assert_eq!(
            refused.findings.errors().next().unwrap().kind,
            FindingKind::MissingTarget
        );
    }

    #[test]
    fn test_export_then_import() {
        let mut doc = CanvasDocument::new("P", "Desc");
        doc.version = Some("1.0.0".into());
        doc.tasks_mut().push(Task::new("t1", "Score"));

        let out = export_document(&doc, &options()).unwrap();
        assert!(out.report.is_empty());
        assert!(out.side_files.is_empty());

        let imported = import_container(&out.container, &HashMap::new()).unwrap();
        assert_eq!(imported.document.tasks()[0].title, "Score");
        assert!(imported.warnings.is_empty());
        assert_eq!(imported.schema_version.as_deref(), Some(CANVAS_SCHEMA_VERSION));
    }

    #[test]
    fn test_schema_version_mismatch_warns() {
        let doc = CanvasDocument::new("P", "");
        let out = export_document(
            &doc,
            &EncodeOptions::new(CodecConfig::default()).with_schema_version("0.9.0"),
        )
        .unwrap();
        let imported = import_container(&out.container, &HashMap::new()).unwrap();
        assert_eq!(imported.warnings.len(), 1);
        assert_eq!(imported.warnings[0].kind, MigrationKind::SchemaVersionMismatch);
        assert!(imported.warnings[0].message.contains("0.9.0"));
    }

    #[test]
    fn test_import_json_structural_error() {
        let err = import_json(r#"{"@context": "https://w3id.org/ro/crate/1.1/context"}"#).unwrap_err();
        assert!(matches!(err, DecodeError::MissingGraph));
    }
}
