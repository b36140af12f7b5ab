//! Datasets used by the project.

use serde::{Deserialize, Serialize};

/// Dataset list wrapper.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataAccess {
    /// Datasets.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub datasets: Vec<Dataset>,
}

/// Access classification of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessRights {
    /// Open.
    Open,
    /// Restricted.
    Restricted,
    /// Confidential.
    Confidential,
    /// Highly restricted.
    HighlyRestricted,
}

impl AccessRights {
    /// Parse from the wire spelling.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "open" => Some(Self::Open),
            "restricted" => Some(Self::Restricted),
            "confidential" => Some(Self::Confidential),
            "highly-restricted" => Some(Self::HighlyRestricted),
            _ => None,
        }
    }

    /// Wire spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Restricted => "restricted",
            Self::Confidential => "confidential",
            Self::HighlyRestricted => "highly-restricted",
        }
    }
}

/// A dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    /// Caller-supplied id.
    pub id: String,
    /// Title.
    #[serde(default)]
    pub title: String,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Encoding format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// License URL or name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    /// Access classification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_rights: Option<AccessRights>,
    /// DUO-style data-use terms (term IRIs).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub duo_terms: Vec<String>,
    /// Persistent identifier.
    #[serde(default, rename = "pid", skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    /// Publisher.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    /// Landing page / dataset sheet URI.
    #[serde(default, rename = "datasetSheetUri", skip_serializing_if = "Option::is_none")]
    pub landing_page: Option<String>,
    /// Whether the dataset holds personal data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains_personal_data: Option<bool>,
    /// Sensitivity level, free text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensitivity_level: Option<String>,
}

impl Dataset {
    /// Create a dataset.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Default::default()
        }
    }
}
