//! Codec configuration.
//!
//! ## Configuration
//!
//! All settings can be overridden via environment variables:
//! - `CANVAS_CRATE_CONTEXT`: base context URL (default: RO-Crate 1.2 context)
//! - `CANVAS_CRATE_PROFILE`: profile the descriptor conforms to (default: RO-Crate 1.2)
//! - `CANVAS_CRATE_VOCAB`: IRI bound to the local `aac` prefix
//! - `CANVAS_CRATE_SIDE_PAYLOADS`: `inline` or `files` (default: inline)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::DisplayState;
use crate::{RO_CRATE_CONTEXT, RO_CRATE_PROFILE};

/// Default IRI for the local vocabulary.
pub const DEFAULT_VOCAB_NAMESPACE: &str = "https://w3id.org/agentic-automation-canvas/vocab#";

/// Where side payloads are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SidePayloadMode {
    /// As JSON objects on the root node.
    Inline,
    /// As file-descriptor nodes, with bytes handed to the external packer.
    Files,
}

impl SidePayloadMode {
    /// Parse from a config string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inline" => Some(Self::Inline),
            "files" => Some(Self::Files),
            _ => None,
        }
    }
}

impl Default for SidePayloadMode {
    fn default() -> Self {
        Self::Inline
    }
}

/// Codec-wide configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Base context URL written first in `@context`.
    pub context_url: String,
    /// Profile URL the descriptor `conformsTo`.
    pub profile_url: String,
    /// IRI bound to the local prefix.
    pub vocab_namespace: String,
    /// Root node name when the project has no title.
    pub default_root_name: String,
    /// Document version when none is set.
    pub default_version: String,
    /// Side-payload placement.
    pub side_payload_mode: SidePayloadMode,
}

impl CodecConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            context_url: std::env::var("CANVAS_CRATE_CONTEXT").unwrap_or(defaults.context_url),
            profile_url: std::env::var("CANVAS_CRATE_PROFILE").unwrap_or(defaults.profile_url),
            vocab_namespace: std::env::var("CANVAS_CRATE_VOCAB").unwrap_or(defaults.vocab_namespace),
            side_payload_mode: std::env::var("CANVAS_CRATE_SIDE_PAYLOADS")
                .ok()
                .and_then(|s| SidePayloadMode::from_str(&s))
                .unwrap_or(defaults.side_payload_mode),
            ..defaults
        }
    }

    /// Builder: set side-payload placement.
    pub fn with_side_payloads(mut self, mode: SidePayloadMode) -> Self {
        self.side_payload_mode = mode;
        self
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            context_url: RO_CRATE_CONTEXT.to_string(),
            profile_url: RO_CRATE_PROFILE.to_string(),
            vocab_namespace: DEFAULT_VOCAB_NAMESPACE.to_string(),
            default_root_name: "Agentic Automation Project".to_string(),
            default_version: "0.1.0".to_string(),
            side_payload_mode: SidePayloadMode::Inline,
        }
    }
}

/// Per-call encode options.
#[derive(Debug, Clone, Default)]
pub struct EncodeOptions {
    /// Codec configuration.
    pub config: CodecConfig,
    /// Dashboard display-group state to carry along.
    pub display_state: Option<DisplayState>,
    /// Schema-version tag written on the root.
    pub schema_version: Option<String>,
    /// Publish date; today when absent.
    pub publish_date: Option<NaiveDate>,
}

impl EncodeOptions {
    /// Create options with a configuration.
    pub fn new(config: CodecConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Builder: carry display state.
    pub fn with_display_state(mut self, state: DisplayState) -> Self {
        self.display_state = Some(state);
        self
    }

    /// Builder: set schema-version tag.
    pub fn with_schema_version(mut self, version: impl Into<String>) -> Self {
        self.schema_version = Some(version.into());
        self
    }

    /// Builder: pin the publish date.
    pub fn with_publish_date(mut self, date: NaiveDate) -> Self {
        self.publish_date = Some(date);
        self
    }

    /// Publish date as `YYYY-MM-DD`.
    pub fn publish_date_string(&self) -> String {
        self.publish_date
            .unwrap_or_else(|| chrono::Utc::now().date_naive())
            .format("%Y-%m-%d")
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = CodecConfig::default();
        assert_eq!(c.context_url, "https://w3id.org/ro/crate/1.2/context");
        assert_eq!(c.side_payload_mode, SidePayloadMode::Inline);
        assert_eq!(c.default_version, "0.1.0");
    }

    #[test]
    fn test_side_payload_parsing() {
        assert_eq!(SidePayloadMode::from_str("FILES"), Some(SidePayloadMode::Files));
        assert_eq!(SidePayloadMode::from_str("zip"), None);
    }

    #[test]
    fn test_pinned_publish_date() {
        let opts = EncodeOptions::default()
            .with_publish_date(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(opts.publish_date_string(), "2025-03-01");
    }
}
