//! Identity Registry.
//!
//! Maps partial identity evidence (name, external identifier, affiliation)
//! onto a single Person node id, and records role assignments separately
//! from identity. One registry is built per encode call.
//!
//! ## Matching Order
//!
//! ```text
//! query ──► external id index ──► (name, affiliation) index ──► soft scan ──► allocate
//!            exact, normalized      exact, normalized          evidence-free
//!                                                              records only
//! ```
//!
//! The soft tier merges two evidence-free records that share a name. That
//! can conflate two different people; every such merge is kept and reported
//! by [`IdentityRegistry::validate`].

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::graph::{keys, EntityKind, Node};
use crate::types::{FindingKind, Person, ValidationFinding};

/// Normalize an external identifier: trimmed, lowercase, no whitespace.
pub fn normalize_external_id(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Normalize a name or affiliation: lowercase, single-spaced.
pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Identity evidence for one person reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityQuery {
    /// Display name.
    pub name: String,
    /// Stable external identifier.
    pub external_id: Option<String>,
    /// Affiliation.
    pub affiliation: Option<String>,
}

impl IdentityQuery {
    /// Name-only evidence.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder: set the external identifier.
    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    /// Builder: set the affiliation.
    pub fn with_affiliation(mut self, affiliation: impl Into<String>) -> Self {
        self.affiliation = Some(affiliation.into());
        self
    }
}

impl From<&Person> for IdentityQuery {
    fn from(person: &Person) -> Self {
        Self {
            name: person.name.clone(),
            external_id: person.external_id.clone(),
            affiliation: person.affiliation.clone(),
        }
    }
}

/// One resolved identity.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonRecord {
    /// Node id.
    pub id: String,
    /// Name as first seen.
    pub name: String,
    /// Affiliation, if any evidence supplied one.
    pub affiliation: Option<String>,
    /// External identifier as first seen.
    pub external_id: Option<String>,
    /// Document-level person id of the first document person resolved here.
    pub local_id: Option<String>,
    /// Local job title.
    pub local_title: Option<String>,
}

impl PersonRecord {
    fn is_evidence_free(&self) -> bool {
        self.external_id.is_none() && self.affiliation.is_none()
    }
}

/// Context a role is used in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoleUsage {
    /// Project stakeholder.
    Stakeholder,
    /// Agent of a governance stage.
    StageAgent,
    /// Stakeholder of a single task.
    TaskAgent,
}

impl RoleUsage {
    /// Parse from the wire spelling.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "stakeholder" => Some(Self::Stakeholder),
            "stage-agent" => Some(Self::StageAgent),
            "task-agent" => Some(Self::TaskAgent),
            _ => None,
        }
    }

    /// Wire spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stakeholder => "stakeholder",
            Self::StageAgent => "stage-agent",
            Self::TaskAgent => "task-agent",
        }
    }
}

/// A role assignment request.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleAssignment {
    /// Person node id.
    pub person_id: String,
    /// Role label.
    pub role: Option<String>,
    /// Usage context.
    pub usage: RoleUsage,
    /// Scope node id (stage or task); project-wide when absent.
    pub scope: Option<String>,
    /// Free-text context.
    pub role_context: Option<String>,
    /// Stakeholder values.
    pub values: Vec<String>,
}

impl RoleAssignment {
    /// Create an assignment.
    pub fn new(person_id: impl Into<String>, role: Option<String>, usage: RoleUsage) -> Self {
        Self {
            person_id: person_id.into(),
            role,
            usage,
            scope: None,
            role_context: None,
            values: Vec::new(),
        }
    }

    /// Builder: scope to a node.
    pub fn scoped(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Builder: set role context.
    pub fn with_context(mut self, context: Option<String>) -> Self {
        self.role_context = context;
        self
    }

    /// Builder: set values.
    pub fn with_values(mut self, values: Vec<String>) -> Self {
        self.values = values;
        self
    }

    fn key(&self) -> RoleKey {
        (
            self.person_id.clone(),
            self.role.clone().unwrap_or_default(),
            self.usage,
            self.scope.clone(),
        )
    }
}

/// A stored role record.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleRecord {
    /// Role node id.
    pub id: String,
    /// The assignment.
    pub assignment: RoleAssignment,
}

type RoleKey = (String, String, RoleUsage, Option<String>);

/// A soft-tier merge, kept for reporting.
#[derive(Debug, Clone, PartialEq)]
struct SoftMerge {
    name: String,
    person_id: String,
}

/// Identity Registry for one encode call.
#[derive(Debug, Default)]
pub struct IdentityRegistry {
    records: Vec<PersonRecord>,
    /// Normalized external id -> record index.
    by_external: HashMap<String, usize>,
    /// (normalized name, normalized affiliation) -> record index.
    by_name_affiliation: HashMap<(String, String), usize>,
    roles: Vec<RoleRecord>,
    role_index: HashMap<RoleKey, usize>,
    soft_merges: Vec<SoftMerge>,
}

impl IdentityRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve identity evidence to a node id, allocating one if nothing matches.
    pub fn resolve(&mut self, query: &IdentityQuery) -> String {
        let external = non_blank(query.external_id.as_deref());
        let affiliation = non_blank(query.affiliation.as_deref());
        let norm_name = normalize_name(&query.name);

        if let Some(ext) = external {
            if let Some(&idx) = self.by_external.get(&normalize_external_id(ext)) {
                return self.records[idx].id.clone();
            }
        }

        if let Some(aff) = affiliation {
            let key = (norm_name.clone(), normalize_name(aff));
            if let Some(&idx) = self.by_name_affiliation.get(&key) {
                let record_has_external = self.records[idx].external_id.is_some();
                match (record_has_external, external) {
                    // Different external ids are different people.
                    (true, Some(_)) => {}
                    (false, Some(ext)) => {
                        self.records[idx].external_id = Some(ext.to_string());
                        self.by_external.insert(normalize_external_id(ext), idx);
                        return self.records[idx].id.clone();
                    }
                    _ => return self.records[idx].id.clone(),
                }
            }
        }

        if external.is_none() && affiliation.is_none() {
            let mut candidates = self
                .records
                .iter()
                .filter(|r| r.is_evidence_free() && normalize_name(&r.name) == norm_name);
            let candidate = candidates.next();
            // Evidence-free records sharing a name are merged on arrival, so there is at most one.
            debug_assert!(candidates.next().is_none(), "duplicate evidence-free record for {}", norm_name);
            if let Some(record) = candidate {
                let id = record.id.clone();
                tracing::warn!(
                    name = %query.name,
                    person_id = %id,
                    "Merged person by name alone; no identifier or affiliation to confirm"
                );
                self.soft_merges.push(SoftMerge {
                    name: query.name.clone(),
                    person_id: id.clone(),
                });
                return id;
            }
        }

        self.allocate(query, external, affiliation, norm_name)
    }

    fn allocate(
        &mut self,
        query: &IdentityQuery,
        external: Option<&str>,
        affiliation: Option<&str>,
        norm_name: String,
    ) -> String {
        let idx = self.records.len();
        let id = format!("#person-{}", idx);
        self.records.push(PersonRecord {
            id: id.clone(),
            name: query.name.trim().to_string(),
            affiliation: affiliation.map(str::to_string),
            external_id: external.map(str::to_string),
            local_id: None,
            local_title: None,
        });
        if let Some(ext) = external {
            self.by_external.insert(normalize_external_id(ext), idx);
        }
        if let Some(aff) = affiliation {
            self.by_name_affiliation
                .entry((norm_name, normalize_name(aff)))
                .or_insert(idx);
        }
        id
    }

    /// Resolve a document person, recording its local id and title on the record.
    pub fn register_person(&mut self, person: &Person) -> String {
        let id = self.resolve(&IdentityQuery::from(person));
        if let Some(record) = self.records.iter_mut().find(|r| r.id == id) {
            if record.local_id.is_none() && !person.id.is_empty() {
                record.local_id = Some(person.id.clone());
            }
            if record.local_title.is_none() {
                record.local_title = person.local_title.clone();
            }
        }
        id
    }

    /// Append a role record unless an identical one exists. Returns the role node id.
    pub fn assign_role(&mut self, assignment: RoleAssignment) -> String {
        let key = assignment.key();
        if let Some(&idx) = self.role_index.get(&key) {
            let existing = &mut self.roles[idx].assignment;
            if existing.role_context.is_none() {
                existing.role_context = assignment.role_context;
            }
            if existing.values.is_empty() {
                existing.values = assignment.values;
            }
            return self.roles[idx].id.clone();
        }
        let id = format!("#role-{}", self.roles.len());
        self.role_index.insert(key, self.roles.len());
        self.roles.push(RoleRecord {
            id: id.clone(),
            assignment,
        });
        id
    }

    /// Resolved identities in allocation order.
    pub fn persons(&self) -> &[PersonRecord] {
        &self.records
    }

    /// Role records in assignment order.
    pub fn roles(&self) -> &[RoleRecord] {
        &self.roles
    }

    /// Ambiguity findings.
    ///
    /// Warns once per soft-tier merge, and once per name shared by two or
    /// more identities of which at least two carry no external identifier.
    pub fn validate(&self) -> Vec<ValidationFinding> {
        let mut findings: Vec<ValidationFinding> = self
            .soft_merges
            .iter()
            .map(|m| {
                ValidationFinding::warning(
                    FindingKind::AmbiguousIdentity,
                    m.person_id.clone(),
                    format!(
                        "Person '{}' was merged into {} by name alone; add an identifier or affiliation to confirm.",
                        m.name, m.person_id
                    ),
                )
            })
            .collect();

        let mut by_name: BTreeMap<String, Vec<&PersonRecord>> = BTreeMap::new();
        for record in &self.records {
            by_name.entry(normalize_name(&record.name)).or_default().push(record);
        }
        for group in by_name.values().filter(|g| g.len() >= 2) {
            let undisambiguated = group.iter().filter(|r| r.is_evidence_free()).count();
            if undisambiguated >= 1 {
                let ids = group.iter().map(|r| r.id.as_str()).collect::<Vec<_>>().join(", ");
                findings.push(ValidationFinding::warning(
                    FindingKind::AmbiguousIdentity,
                    ids.clone(),
                    format!(
                        "{} persons named '{}' cannot be told apart ({}); {} have neither an identifier nor an affiliation.",
                        group.len(),
                        group[0].name,
                        ids,
                        undisambiguated
                    ),
                ));
            }
        }
        findings
    }

    /// Identity-only Person nodes.
    pub fn all_person_nodes(&self) -> Vec<Node> {
        self.records
            .iter()
            .map(|r| {
                let mut node = Node::of_kind(r.id.clone(), EntityKind::Person);
                node.set(keys::NAME, r.name.clone());
                node.set_opt(keys::AFFILIATION, r.affiliation.clone());
                node.set_opt(keys::IDENTIFIER, r.external_id.clone());
                node.set_opt(keys::JOB_TITLE, r.local_title.clone());
                node.set_opt(keys::LOCAL_ID, r.local_id.clone());
                node
            })
            .collect()
    }

    /// Independent Role nodes.
    pub fn all_role_nodes(&self) -> Vec<Node> {
        self.roles
            .iter()
            .map(|r| {
                let a = &r.assignment;
                let mut node = Node::of_kind(r.id.clone(), EntityKind::Role);
                node.set_opt(keys::ROLE_NAME, a.role.clone());
                node.set_ref(keys::PERSON, &a.person_id);
                node.set(keys::USAGE_CONTEXT, a.usage.as_str());
                if let Some(scope) = &a.scope {
                    node.set_ref(keys::SCOPE, scope);
                }
                node.set_opt(keys::ROLE_CONTEXT, a.role_context.clone());
                node.set_strings(keys::VALUES, &a.values);
                node
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORCID: &str = "https://orcid.org/0000-0002-1825-0097";

    #[test]
    fn test_external_id_case_and_whitespace_insensitive() {
        let mut reg = IdentityRegistry::new();
        let a = reg.resolve(&IdentityQuery::named("Josiah Carberry").with_external_id(ORCID));
        let b = reg.resolve(
            &IdentityQuery::named("J. Carberry").with_external_id(" HTTPS://ORCID.org/0000-0002-1825-0097 "),
        );
        assert_eq!(a, b);
        assert_eq!(reg.persons().len(), 1);
    }

    #[test]
    fn test_distinct_external_ids_stay_distinct() {
        let mut reg = IdentityRegistry::new();
        let a = reg.resolve(&IdentityQuery::named("Alex Kim").with_external_id("x-1"));
        let b = reg.resolve(&IdentityQuery::named("Alex Kim").with_external_id("x-2"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_name_and_affiliation_match() {
        let mut reg = IdentityRegistry::new();
        let a = reg.resolve(&IdentityQuery::named("Alex Kim").with_affiliation("Uni A"));
        let b = reg.resolve(&IdentityQuery::named("alex  kim").with_affiliation("uni a"));
        let c = reg.resolve(&IdentityQuery::named("Alex Kim").with_affiliation("Uni B"));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_affiliation_match_enriches_external_id() {
        let mut reg = IdentityRegistry::new();
        let a = reg.resolve(&IdentityQuery::named("Alex Kim").with_affiliation("Uni A"));
        let b = reg.resolve(
            &IdentityQuery::named("Alex Kim")
                .with_affiliation("Uni A")
                .with_external_id(ORCID),
        );
        let c = reg.resolve(&IdentityQuery::named("Someone").with_external_id(ORCID));
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn test_soft_match_only_between_evidence_free_records() {
        let mut reg = IdentityRegistry::new();
        let with_id = reg.resolve(&IdentityQuery::named("Sam Lee").with_external_id("id-1"));
        let bare_a = reg.resolve(&IdentityQuery::named("Sam Lee"));
        let bare_b = reg.resolve(&IdentityQuery::named("sam lee"));
        assert_ne!(with_id, bare_a);
        assert_eq!(bare_a, bare_b);

        let findings = reg.validate();
        assert_eq!(findings.len(), 2);
        assert!(findings.iter().all(|f| f.kind == FindingKind::AmbiguousIdentity));
        assert!(findings[0].message.contains("by name alone"));
        assert!(findings[1].message.starts_with("2 persons named 'Sam Lee'"));
    }

    #[test]
    fn test_soft_scan_keeps_one_evidence_free_record_per_name() {
        let mut reg = IdentityRegistry::new();
        let ids: Vec<String> = ["Kim Park", "kim park", " KIM  PARK "]
            .iter()
            .map(|n| reg.resolve(&IdentityQuery::named(*n)))
            .collect();
        assert!(ids.iter().all(|id| id == &ids[0]));
        assert_eq!(reg.persons().iter().filter(|r| r.is_evidence_free()).count(), 1);
    }

    #[test]
    fn test_validate_flags_shared_names_without_identifiers() {
        let mut reg = IdentityRegistry::new();
        reg.resolve(&IdentityQuery::named("Sam Lee").with_affiliation("A"));
        reg.resolve(&IdentityQuery::named("Sam Lee").with_affiliation("B"));
        assert!(reg.validate().is_empty(), "affiliation tells them apart");

        reg.resolve(&IdentityQuery::named("Sam Lee"));
        let findings = reg.validate();
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.starts_with("3 persons named 'Sam Lee'"));

        let mut reg = IdentityRegistry::new();
        reg.resolve(&IdentityQuery::named("Sam Lee").with_external_id("1"));
        reg.resolve(&IdentityQuery::named("Sam Lee").with_external_id("2"));
        assert!(reg.validate().is_empty());
    }

    #[test]
    fn test_role_dedup_and_separation() {
        let mut reg = IdentityRegistry::new();
        let p = reg.resolve(&IdentityQuery::named("Ana").with_external_id(ORCID));

        let r1 = reg.assign_role(RoleAssignment::new(&p, Some("Lead".into()), RoleUsage::StageAgent).scoped("#s1"));
        let r2 = reg.assign_role(RoleAssignment::new(&p, Some("Lead".into()), RoleUsage::StageAgent).scoped("#s1"));
        let r3 = reg.assign_role(RoleAssignment::new(&p, Some("Lead".into()), RoleUsage::StageAgent).scoped("#s2"));
        assert_eq!(r1, r2);
        assert_ne!(r1, r3);
        assert_eq!(reg.roles().len(), 2);

        let person = &reg.all_person_nodes()[0];
        assert!(person.get(keys::ROLE_NAME).is_none());
        assert!(person.get(keys::ROLE).is_none());

        let role = &reg.all_role_nodes()[1];
        assert_eq!(role.refs(keys::PERSON), vec![p]);
        assert_eq!(role.refs(keys::SCOPE), vec!["#s2"]);
        assert_eq!(role.str_field(keys::USAGE_CONTEXT), Some("stage-agent"));
    }

    #[test]
    fn test_register_person_keeps_first_local_id() {
        let mut reg = IdentityRegistry::new();
        let a = reg.register_person(&Person::new("p1", "Ana").with_external_id(ORCID));
        let b = reg.register_person(&Person::new("p2", "Ana B.").with_external_id(ORCID));
        assert_eq!(a, b);
        assert_eq!(reg.persons()[0].local_id.as_deref(), Some("p1"));
    }
}
