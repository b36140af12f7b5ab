//! Dashboard display-group state.
//!
//! Not part of the canonical document; carried alongside it in the crate as
//! a side payload.

use serde::{Deserialize, Serialize};

/// Reference to one benefit of one task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenefitRef {
    /// Task id.
    pub requirement_id: String,
    /// Index into the task's benefit list.
    pub benefit_index: usize,
}

/// A group of benefits shown together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayGroup {
    /// Group id.
    pub id: u32,
    /// Benefit kind shared by the group.
    pub benefit_type: String,
    /// Metric id shared by the group.
    pub metric_id: String,
    /// Members.
    #[serde(default)]
    pub benefit_refs: Vec<BenefitRef>,
}

/// Display-group state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayState {
    /// Groups.
    #[serde(default)]
    pub display_groups: Vec<DisplayGroup>,
}
