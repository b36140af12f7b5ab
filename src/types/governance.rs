//! Governance stages and the agents acting in them.

use serde::{Deserialize, Serialize};

/// Stage list wrapper.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Governance {
    /// Stages in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stages: Vec<GovernanceStage>,
}

/// A governance stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernanceStage {
    /// Caller-supplied id.
    pub id: String,
    /// Stage name.
    #[serde(default)]
    pub name: String,
    /// Start date (ISO).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// End date (ISO).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// Agents acting in this stage.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub agents: Vec<Agent>,
    /// Milestones.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub milestones: Vec<Milestone>,
    /// Compliance standard tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub compliance_standards: Vec<String>,
}

impl GovernanceStage {
    /// Create a stage.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add an agent.
    pub fn with_agent(mut self, agent: Agent) -> Self {
        self.agents.push(agent);
        self
    }
}

/// Kind of agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    /// A person; the agent references a `Person` by id.
    Person,
    /// An organization, named directly.
    Organization,
    /// A software agent, named directly.
    Software,
}

impl Default for AgentKind {
    fn default() -> Self {
        Self::Person
    }
}

/// An agent of a stage: a person reference with a role, or a named
/// organization/software agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    /// Referenced person id when `kind` is person.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person_id: Option<String>,
    /// Name when `kind` is organization or software.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Role label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Agent kind.
    #[serde(rename = "type", default)]
    pub kind: AgentKind,
    /// Free-text context for the role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_context: Option<String>,
}

impl Agent {
    /// A person agent.
    pub fn person(person_id: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            person_id: Some(person_id.into()),
            role: Some(role.into()),
            kind: AgentKind::Person,
            ..Default::default()
        }
    }

    /// A named non-person agent.
    pub fn named(kind: AgentKind, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            kind,
            ..Default::default()
        }
    }
}

/// A stage milestone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    /// What is achieved.
    pub description: String,
    /// How it is measured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kpi: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_agent_kind_wire_name() {
        let a: Agent = serde_json::from_value(json!({"name": "Acme", "type": "organization"})).unwrap();
        assert_eq!(a.kind, AgentKind::Organization);
        assert_eq!(a.name.as_deref(), Some("Acme"));

        let p = Agent::person("person-0", "Lead");
        assert_eq!(serde_json::to_value(&p).unwrap()["type"], "person");
    }
}
