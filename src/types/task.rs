//! Tasks (requirements) and their per-task feasibility.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use super::benefit::{Benefit, BenefitKind};
use super::lenient::Lenient;

/// Category of the unit of work a task processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitCategory {
    /// A discrete item (document, case, record).
    Item,
    /// An interaction (message, meeting).
    Interaction,
    /// A computation (analysis run).
    Computation,
    /// Anything else.
    Other,
}

impl UnitCategory {
    /// Parse from the current wire spelling.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "item" => Some(Self::Item),
            "interaction" => Some(Self::Interaction),
            "computation" => Some(Self::Computation),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    /// Map a value from an older schema revision onto the current enumeration.
    pub fn from_historical(s: &str) -> Option<Self> {
        match s {
            "case" | "document" | "record" => Some(Self::Item),
            "message" | "meeting" => Some(Self::Interaction),
            "analysisRun" => Some(Self::Computation),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    /// Wire spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Item => "item",
            Self::Interaction => "interaction",
            Self::Computation => "computation",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for UnitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Low.
    Low,
    /// Medium.
    Medium,
    /// High.
    High,
    /// Critical.
    Critical,
}

impl Priority {
    /// Parse from the wire spelling.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }

    /// Wire spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// Technical risk shares the priority scale.
pub type RiskLevel = Priority;

/// Task status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Not started.
    Planned,
    /// Underway.
    InProgress,
    /// Done.
    Completed,
    /// Dropped.
    Cancelled,
}

impl TaskStatus {
    /// Parse from the wire spelling.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "planned" => Some(Self::Planned),
            "in-progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Wire spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Time unit a task's time benefits are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    /// Minutes.
    Minutes,
    /// Hours.
    Hours,
    /// Days.
    Days,
}

/// Optional per-task feasibility block.
///
/// Known fields are typed; anything else the authoring surface adds is kept
/// in `additional` so the block survives a round trip untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFeasibility {
    /// Technical risk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technical_risk: Option<RiskLevel>,
    /// Effort estimate, free text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effort_estimate: Option<String>,
    /// Notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feasibility_notes: Option<String>,
    /// Model selection (open-source, frontier-model, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_selection: Option<String>,
    /// Model name/version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    /// URI of a model card describing the model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_card_uri: Option<String>,
    /// Remaining fields.
    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

/// A unit of work to be automated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Caller-supplied id.
    pub id: String,
    /// Title. Empty in documents from older schema revisions.
    #[serde(default)]
    pub title: String,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// User story.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_story: Option<String>,
    /// Priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// Status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    /// Unit-of-work descriptor, e.g. "one document".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_of_work: Option<String>,
    /// Unit category; may hold a historical value until normalized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_category: Option<Lenient<UnitCategory>>,
    /// Units processed per month.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_per_month: Option<f64>,
    /// Time unit for time benefits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_unit: Option<TimeUnit>,
    /// Benefits, always read and written together with the task.
    #[serde(default)]
    pub benefits: Vec<Benefit>,
    /// Ids of tasks this one depends on. Not required to resolve.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    /// Person ids of the task's stakeholders.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stakeholders: Vec<String>,
    /// Per-task feasibility.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feasibility: Option<TaskFeasibility>,
    /// Deprecated task-level oversight; relocated onto a time benefit by the normalizer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub human_oversight_minutes_per_unit: Option<f64>,
}

impl Task {
    /// Create a task with an id and title.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    /// Add a benefit.
    pub fn with_benefit(mut self, benefit: Benefit) -> Self {
        self.benefits.push(benefit);
        self
    }

    /// Add a dependency.
    pub fn depending_on(mut self, task_id: impl Into<String>) -> Self {
        self.depends_on.push(task_id.into());
        self
    }

    /// Index of the first time-kind benefit.
    pub fn first_time_benefit(&self) -> Option<usize> {
        self.benefits.iter().position(|b| b.kind == BenefitKind::Time)
    }
}
