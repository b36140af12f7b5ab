//! The canonical document: project metadata, persons and the sections that
//! reference them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::benefit::ValueDriver;
use super::dataset::DataAccess;
use super::governance::Governance;
use super::lenient::Lenient;
use super::outcome::Outcomes;
use super::task::{RiskLevel, Task};

/// The authoritative in-memory project record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasDocument {
    /// Project metadata.
    pub project: Project,
    /// Persons referenced by id from stakeholders, tasks and stage agents.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub persons: Vec<Person>,
    /// Tasks and project stakeholders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_expectations: Option<UserExpectations>,
    /// Project-level feasibility block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub developer_feasibility: Option<DeveloperFeasibility>,
    /// Governance stages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub governance: Option<Governance>,
    /// Datasets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_access: Option<DataAccess>,
    /// Deliverables, publications and evaluations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcomes: Option<Outcomes>,
    /// Document version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Date the version was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_date: Option<String>,
}

impl CanvasDocument {
    /// Create a document with only project title and description.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            project: Project {
                title: title.into(),
                description: description.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Tasks, empty when the section is absent.
    pub fn tasks(&self) -> &[Task] {
        self.user_expectations
            .as_ref()
            .map(|u| u.requirements.as_slice())
            .unwrap_or(&[])
    }

    /// Project stakeholders, empty when the section is absent.
    pub fn stakeholders(&self) -> &[Stakeholder] {
        self.user_expectations
            .as_ref()
            .map(|u| u.stakeholders.as_slice())
            .unwrap_or(&[])
    }

    /// Look up a person by id.
    pub fn person(&self, id: &str) -> Option<&Person> {
        self.persons.iter().find(|p| p.id == id)
    }

    /// Mutable access to the task list, creating the section when absent.
    pub fn tasks_mut(&mut self) -> &mut Vec<Task> {
        &mut self
            .user_expectations
            .get_or_insert_with(UserExpectations::default)
            .requirements
    }
}

/// Project metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Title.
    #[serde(default)]
    pub title: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Objective.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objective: Option<String>,
    /// Project stage, free text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_stage: Option<String>,
    /// Start date (ISO).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// End date (ISO).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// Domain tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub domain: Vec<String>,
    /// Keywords.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    /// Persistent identifier of the project.
    #[serde(default, rename = "projectId", skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    /// License URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    /// Funding grant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funding_grant: Option<String>,
    /// Lead organization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_organization: Option<String>,
    /// One-line headline value summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline_value: Option<String>,
    /// Primary value driver; may hold a rejected value until normalized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_value_driver: Option<Lenient<ValueDriver>>,
    /// Project version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Project version date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_date: Option<String>,
}

/// A person. Identity only; roles live in separate records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    /// Opaque id referenced from the rest of the document.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Affiliation, used for disambiguation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliation: Option<String>,
    /// Stable external identifier (ORCID-style URI).
    #[serde(default, rename = "orcid", skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    /// Local job title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_title: Option<String>,
    /// Deprecated multi-value titles; collapsed into `local_title` by the normalizer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_titles: Option<Vec<String>>,
}

impl Person {
    /// Create a person with id and name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the external identifier.
    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    /// Set the affiliation.
    pub fn with_affiliation(mut self, affiliation: impl Into<String>) -> Self {
        self.affiliation = Some(affiliation.into());
        self
    }
}

/// Tasks plus project-level stakeholders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserExpectations {
    /// Tasks.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requirements: Vec<Task>,
    /// Stakeholders.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stakeholders: Vec<Stakeholder>,
}

/// A project stakeholder: a person reference plus a role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stakeholder {
    /// Referenced person id.
    pub person_id: String,
    /// Role label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// What the stakeholder values.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    /// Free-text context for the role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_context: Option<String>,
}

/// Technology readiness level, current and target.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrlLevel {
    /// Current level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<u8>,
    /// Target level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<u8>,
}

/// Project-level feasibility, carried as a side payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperFeasibility {
    /// Technology readiness.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trl_level: Option<TrlLevel>,
    /// Technical risk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technical_risk: Option<RiskLevel>,
    /// Effort estimate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effort_estimate: Option<String>,
    /// Notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feasibility_notes: Option<String>,
    /// Remaining fields.
    #[serde(flatten)]
    pub additional: Map<String, Value>,
}
