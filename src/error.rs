//! Error types.
//!
//! Only structural problems with the container are fatal on import. Dangling
//! references, unknown node types and malformed sub-records are recovered
//! inside the decoder and never surface here.

use thiserror::Error;

use crate::types::ValidationReport;

/// Fatal decode errors.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The container has no context declaration.
    #[error("structural error: missing @context")]
    MissingContext,

    /// The container has no node list.
    #[error("structural error: missing @graph")]
    MissingGraph,

    /// The container is present but not shaped like a graph.
    #[error("structural error: {0}")]
    MalformedGraph(String),

    /// The input is not JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl DecodeError {
    /// Whether this is one of the structural errors (as opposed to bad JSON).
    pub fn is_structural(&self) -> bool {
        !matches!(self, Self::Json(_))
    }
}

/// Export refused because validation produced at least one error.
///
/// The full report (errors and warnings) is handed back to the caller.
#[derive(Debug, Error)]
#[error("export refused: {} error(s) in validation", .findings.errors().count())]
pub struct ExportRefused {
    /// All findings of the refused run.
    pub findings: ValidationReport,
}
