//! Project outcomes: deliverables, publications, evaluations.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Outcome lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outcomes {
    /// Deliverables.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deliverables: Vec<Deliverable>,
    /// Publications.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub publications: Vec<Publication>,
    /// Evaluations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evaluations: Vec<Evaluation>,
}

impl Outcomes {
    /// Whether all lists are empty.
    pub fn is_empty(&self) -> bool {
        self.deliverables.is_empty() && self.publications.is_empty() && self.evaluations.is_empty()
    }
}

/// A deliverable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Deliverable {
    /// Caller-supplied id.
    pub id: String,
    /// Title.
    #[serde(default)]
    pub title: String,
    /// Deliverable type, e.g. "Report", "Software".
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Date (ISO).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Persistent identifier.
    #[serde(default, rename = "pid", skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
}

/// A publication.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    /// Caller-supplied id.
    pub id: String,
    /// Title.
    #[serde(default)]
    pub title: String,
    /// DOI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    /// Author names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,
    /// Date (ISO).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// An evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Caller-supplied id.
    pub id: String,
    /// Evaluation type.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Date (ISO).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Metric readings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Map<String, Value>>,
    /// Results text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<String>,
}
