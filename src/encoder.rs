//! Graph Encoder.
//!
//! Walks a canonical document and emits a flat, ordered node list:
//!
//! ```text
//! descriptor → root → project → plan + steps → stages (+ milestones, agents)
//!   → datasets → outcomes → contextual entities → side files → persons → roles
//! ```
//!
//! The order only keeps the decoder simple; nothing depends on it for
//! correctness. All state (identity registry, id counters) lives in one
//! [`GraphEncoder`] per call.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use regex_lite::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::canonical::{sha256_hex, to_canonical_bytes};
use crate::config::{EncodeOptions, SidePayloadMode};
use crate::graph::vocab::{JSON_MEDIA_TYPE, MODEL_CATEGORY};
use crate::graph::{context_value, ids, keys, EntityKind, GraphContainer, Node};
use crate::identity::{IdentityQuery, IdentityRegistry, RoleAssignment, RoleUsage};
use crate::types::{
    Agent, AgentKind, CanvasDocument, Dataset, GovernanceStage, Task, ValidationFinding,
};
use crate::VOCAB_PREFIX;

fn safe_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]*$").expect("valid safe-id regex"))
}

fn reserved_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(project|user-plan|(person|role|milestone|agent)-[0-9]+)$")
            .expect("valid reserved-id regex")
    })
}

/// Whether a caller id can be reused verbatim as a node id.
pub fn is_safe_id(id: &str) -> bool {
    safe_id_pattern().is_match(id) && !reserved_id_pattern().is_match(id)
}

fn is_url(s: &str) -> bool {
    s.contains("://")
}

fn non_blank(s: &Option<String>) -> Option<&str> {
    s.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn json_of<T: Serialize>(value: &T, what: &str) -> Option<Value> {
    match serde_json::to_value(value) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(field = what, error = %e, "Skipping field that failed to serialize");
            None
        }
    }
}

/// Stage dates are written as full timestamps.
fn stage_timestamp(date: &str, end_of_day: bool) -> String {
    if date.contains('T') {
        date.to_string()
    } else if end_of_day {
        format!("{}T23:59:59Z", date)
    } else {
        format!("{}T00:00:00Z", date)
    }
}

/// License URLs become references; anything else stays a plain name.
fn set_license(node: &mut Node, license: Option<&str>) {
    match license {
        Some(url) if is_url(url) => node.set_ref(keys::LICENSE, url),
        Some(name) => node.set(keys::LICENSE, name),
        None => {}
    }
}

/// A side payload to be packaged next to the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct SideFile {
    /// Path inside the package; also the descriptor node id.
    pub path: String,
    /// Payload.
    pub content: Value,
    /// SHA-256 of the canonical payload bytes.
    pub sha256: String,
}

impl SideFile {
    fn new(path: &str, content: Value) -> Self {
        let sha256 = sha256_hex(&to_canonical_bytes(&content));
        Self {
            path: path.to_string(),
            content,
            sha256,
        }
    }
}

/// Result of one encode call.
#[derive(Debug, Clone)]
pub struct EncodeOutput {
    /// The graph.
    pub container: GraphContainer,
    /// Side payloads in `Files` mode; empty in `Inline` mode.
    pub side_files: Vec<SideFile>,
    /// Identity ambiguity warnings from the registry.
    pub identity_findings: Vec<ValidationFinding>,
}

/// Encode a document. Builds a fresh encoder for the call.
pub fn encode(document: &CanvasDocument, options: &EncodeOptions) -> EncodeOutput {
    GraphEncoder::new(options).encode(document)
}

/// Single-use graph encoder.
pub struct GraphEncoder<'a> {
    options: &'a EncodeOptions,
    registry: IdentityRegistry,
    used_ids: HashSet<String>,
    counters: HashMap<&'static str, usize>,
    /// Document person id -> Person node id.
    person_index: HashMap<String, String>,
    contextual: Vec<Node>,
    contextual_ids: HashSet<String>,
    root_parts: Vec<String>,
}

impl<'a> GraphEncoder<'a> {
    /// Create a new encoder.
    pub fn new(options: &'a EncodeOptions) -> Self {
        let used_ids = [ids::DESCRIPTOR, ids::ROOT, ids::PROJECT, ids::PLAN]
            .iter()
            .map(|s| s.to_string())
            .collect();
        Self {
            options,
            registry: IdentityRegistry::new(),
            used_ids,
            counters: HashMap::new(),
            person_index: HashMap::new(),
            contextual: Vec::new(),
            contextual_ids: HashSet::new(),
            root_parts: Vec::new(),
        }
    }

    /// Reuse the caller id when safe and unused, else synthesize `#category-n`.
    fn allocate_id(&mut self, category: &'static str, source: &str) -> String {
        if is_safe_id(source) {
            let candidate = format!("#{}", source);
            if self.used_ids.insert(candidate.clone()) {
                return candidate;
            }
        }
        loop {
            let counter = self.counters.entry(category).or_insert(0);
            let candidate = format!("#{}-{}", category, *counter);
            *counter += 1;
            if self.used_ids.insert(candidate.clone()) {
                return candidate;
            }
        }
    }

    fn next_id(&mut self, category: &'static str) -> String {
        self.allocate_id(category, "")
    }

    fn person_ref(&self, person_id: &str, context: &str) -> Option<String> {
        let found = self.person_index.get(person_id).cloned();
        if found.is_none() {
            tracing::warn!(person_id, context, "Skipping reference to unknown person");
        }
        found
    }

    fn add_contextual(&mut self, node: Node) {
        if self.contextual_ids.insert(node.id.clone()) {
            self.contextual.push(node);
        }
    }

    /// Encode the document.
    pub fn encode(mut self, doc: &CanvasDocument) -> EncodeOutput {
        for person in &doc.persons {
            let node_id = self.registry.register_person(person);
            self.person_index.entry(person.id.clone()).or_insert(node_id);
        }

        let mut project = self.project_node(doc);
        let (plan, steps) = self.task_nodes(doc.tasks());
        if plan.is_some() {
            project.set_ref(keys::HAS_PLAN, ids::PLAN);
        }
        let stage_nodes = self.stage_nodes(doc);
        let dataset_nodes = self.dataset_nodes(doc);
        let outcome_nodes = self.outcome_nodes(doc, &stage_nodes.last_stage);
        let (file_nodes, side_files, inline_payloads) = self.side_payloads(doc);

        let mut root = self.root_node(doc);
        for (key, value) in inline_payloads {
            root.set(key, value);
        }
        let parts = std::mem::take(&mut self.root_parts);
        root.set_refs(keys::HAS_PART, &parts);

        let context = context_value(
            &self.options.config.context_url,
            VOCAB_PREFIX,
            &self.options.config.vocab_namespace,
        );
        let mut container = GraphContainer::new(context);
        container.nodes.push(self.descriptor_node());
        container.nodes.push(root);
        container.nodes.push(project);
        container.nodes.extend(plan);
        container.nodes.extend(steps);
        container.nodes.extend(stage_nodes.nodes);
        container.nodes.extend(dataset_nodes);
        container.nodes.extend(outcome_nodes);
        container.nodes.extend(std::mem::take(&mut self.contextual));
        container.nodes.extend(file_nodes);
        container.nodes.extend(self.registry.all_person_nodes());
        container.nodes.extend(self.registry.all_role_nodes());

        let identity_findings = self.registry.validate();

        tracing::info!(
            nodes = container.nodes.len(),
            persons = self.registry.persons().len(),
            roles = self.registry.roles().len(),
            side_files = side_files.len(),
            fingerprint = %container.fingerprint(),
            "Encoded canvas document"
        );

        EncodeOutput {
            container,
            side_files,
            identity_findings,
        }
    }

    fn descriptor_node(&self) -> Node {
        let mut node = Node::new(ids::DESCRIPTOR, &["CreativeWork"]);
        node.set_ref(keys::CONFORMS_TO, &self.options.config.profile_url);
        node.set_ref(keys::ABOUT, ids::ROOT);
        node
    }

    fn root_node(&mut self, doc: &CanvasDocument) -> Node {
        let project = &doc.project;
        let config = &self.options.config;
        let mut node = Node::new(ids::ROOT, &["Dataset"]);
        let name = if project.title.trim().is_empty() {
            config.default_root_name.clone()
        } else {
            project.title.clone()
        };
        node.set(keys::NAME, name);
        node.set(keys::DESCRIPTION, project.description.clone());
        node.set(keys::DATE_PUBLISHED, self.options.publish_date_string());
        set_license(&mut node, non_blank(&project.license));
        node.set_ref(keys::ABOUT, ids::PROJECT);
        node.set_ref(keys::MAIN_ENTITY, ids::PROJECT);
        let version = doc
            .version
            .clone()
            .unwrap_or_else(|| self.options.config.default_version.clone());
        node.set(keys::VERSION, version);
        node.set_opt(keys::VERSION_DATE, doc.version_date.clone());
        node.set_opt(keys::SCHEMA_VERSION, self.options.schema_version.clone());
        node
    }

    fn project_node(&mut self, doc: &CanvasDocument) -> Node {
        let p = &doc.project;
        let mut node = Node::of_kind(ids::PROJECT, EntityKind::Project);
        node.set(keys::NAME, p.title.clone());
        node.set(keys::DESCRIPTION, p.description.clone());
        node.set_opt(keys::OBJECTIVE, p.objective.clone());
        node.set_opt(keys::PROJECT_STAGE, p.project_stage.clone());
        node.set_opt(keys::START_DATE, p.start_date.clone());
        node.set_opt(keys::END_DATE, p.end_date.clone());
        node.set_strings(keys::DOMAIN, &p.domain);
        node.set_strings(keys::KEYWORDS, &p.keywords);
        node.set_opt(keys::IDENTIFIER, p.identifier.clone());
        node.set_opt(keys::FUNDING_GRANT, p.funding_grant.clone());
        node.set_opt(keys::LEAD_ORGANIZATION, p.lead_organization.clone());
        node.set_opt(keys::HEADLINE_VALUE, p.headline_value.clone());
        node.set_opt(
            keys::PRIMARY_VALUE_DRIVER,
            p.primary_value_driver.as_ref().map(|d| d.to_string()),
        );
        node.set_opt(keys::VERSION, p.version.clone());
        node.set_opt(keys::VERSION_DATE, p.version_date.clone());

        if let Some(url) = non_blank(&p.license).filter(|l| is_url(l)) {
            let mut license = Node::new(url, &[EntityKind::Outcome.primary()]);
            license.set(keys::NAME, url);
            self.add_contextual(license);
        }
        set_license(&mut node, non_blank(&p.license));

        let mut contributors = Vec::new();
        for s in doc.stakeholders() {
            let Some(person) = self.person_ref(&s.person_id, "stakeholder") else {
                continue;
            };
            self.registry.assign_role(
                RoleAssignment::new(person.clone(), s.role.clone(), RoleUsage::Stakeholder)
                    .with_context(s.role_context.clone())
                    .with_values(s.values.clone()),
            );
            if !contributors.contains(&person) {
                contributors.push(person);
            }
        }
        node.set_refs(keys::CONTRIBUTOR, &contributors);
        node
    }

    fn task_nodes(&mut self, tasks: &[Task]) -> (Option<Node>, Vec<Node>) {
        if tasks.is_empty() {
            return (None, Vec::new());
        }

        let step_ids: Vec<String> = tasks
            .iter()
            .map(|t| self.allocate_id("requirement", &t.id))
            .collect();
        let mut by_local: HashMap<&str, &str> = HashMap::new();
        for (task, id) in tasks.iter().zip(&step_ids) {
            by_local.entry(task.id.as_str()).or_insert(id.as_str());
        }

        let mut plan = Node::of_kind(ids::PLAN, EntityKind::Plan);
        plan.set(keys::NAME, "User Expectations Plan");
        plan.set_refs(keys::HAS_STEP, &step_ids);

        let mut steps = Vec::with_capacity(tasks.len());
        for (task, step_id) in tasks.iter().zip(&step_ids) {
            let mut node = Node::of_kind(step_id.clone(), EntityKind::Step);
            node.set(keys::NAME, task.title.clone());
            node.set(keys::LOCAL_ID, task.id.clone());
            node.set_opt(keys::DESCRIPTION, task.description.clone());
            node.set_opt(keys::USER_STORY, task.user_story.clone());
            node.set_opt(keys::PRIORITY, task.priority.map(|p| p.as_str()));
            node.set_opt(keys::STATUS, task.status.map(|s| s.as_str()));
            node.set_opt(keys::UNIT_OF_WORK, task.unit_of_work.clone());
            node.set_opt(keys::UNIT_CATEGORY, task.unit_category.as_ref().map(|c| c.to_string()));
            node.set_opt(keys::VOLUME_PER_MONTH, task.volume_per_month);
            if let Some(unit) = task.time_unit {
                node.set_opt(keys::TIME_UNIT, json_of(&unit, keys::TIME_UNIT));
            }
            node.set_opt(keys::OVERSIGHT_PER_UNIT, task.human_oversight_minutes_per_unit);
            node.set_opt(keys::BENEFITS, json_of(&task.benefits, keys::BENEFITS));
            node.set_ref(keys::IS_STEP_OF_PLAN, ids::PLAN);

            node.set_strings(keys::DEPENDS_ON, &task.depends_on);
            let preceded: Vec<String> = task
                .depends_on
                .iter()
                .filter_map(|d| by_local.get(d.as_str()).map(|id| id.to_string()))
                .collect();
            node.set_refs(keys::IS_PRECEDED_BY, &preceded);

            let mut stakeholders = Vec::new();
            for person_id in &task.stakeholders {
                let Some(person) = self.person_ref(person_id, "task stakeholder") else {
                    continue;
                };
                self.registry.assign_role(
                    RoleAssignment::new(person.clone(), None, RoleUsage::TaskAgent).scoped(step_id.clone()),
                );
                stakeholders.push(person);
            }
            node.set_refs(keys::STAKEHOLDER, &stakeholders);

            if let Some(feasibility) = &task.feasibility {
                node.set_opt(keys::FEASIBILITY, json_of(feasibility, keys::FEASIBILITY));
                if let Some(uri) = non_blank(&feasibility.model_card_uri) {
                    let mut model = Node::of_kind(uri, EntityKind::Software);
                    model.set(keys::NAME, non_blank(&feasibility.model_name).unwrap_or(uri));
                    model.set(keys::APPLICATION_CATEGORY, MODEL_CATEGORY);
                    model.set(keys::URL, uri);
                    self.add_contextual(model);
                    node.set_ref(keys::MODEL, uri);
                    node.set_ref(keys::USED, uri);
                }
            }
            steps.push(node);
        }
        (Some(plan), steps)
    }

    fn stage_nodes(&mut self, doc: &CanvasDocument) -> StageNodes {
        let stages: &[GovernanceStage] = doc
            .governance
            .as_ref()
            .map(|g| g.stages.as_slice())
            .unwrap_or(&[]);
        let stage_ids: Vec<String> = stages.iter().map(|s| self.allocate_id("stage", &s.id)).collect();

        let mut nodes = Vec::new();
        for (index, (stage, stage_id)) in stages.iter().zip(&stage_ids).enumerate() {
            let mut node = Node::of_kind(stage_id.clone(), EntityKind::Stage);
            node.set(keys::NAME, stage.name.clone());
            node.set(keys::LOCAL_ID, stage.id.clone());
            node.set_opt(keys::STARTED_AT, stage.start_date.as_deref().map(|d| stage_timestamp(d, false)));
            node.set_opt(keys::ENDED_AT, stage.end_date.as_deref().map(|d| stage_timestamp(d, true)));
            node.set_strings(keys::COMPLIANCE_STANDARD, &stage.compliance_standards);
            if index > 0 {
                node.set_ref(keys::INFORMED_BY, &stage_ids[index - 1]);
            }

            let mut sub_nodes = Vec::new();
            let mut milestone_ids = Vec::new();
            for milestone in &stage.milestones {
                let id = self.next_id("milestone");
                let mut m = Node::new(id.clone(), &[EntityKind::Outcome.primary(), EntityKind::Milestone.primary()]);
                m.set(keys::NAME, milestone.description.clone());
                m.set_opt(keys::KPI, milestone.kpi.clone());
                milestone_ids.push(id);
                sub_nodes.push(m);
            }
            node.set_refs(keys::HAS_MILESTONE, &milestone_ids);

            let mut agent_ids = Vec::new();
            for agent in &stage.agents {
                match self.agent_ref(agent, stage_id) {
                    Some(AgentRef::Role(id)) => agent_ids.push(id),
                    Some(AgentRef::Node(agent_node)) => {
                        agent_ids.push(agent_node.id.clone());
                        sub_nodes.push(agent_node);
                    }
                    None => {}
                }
            }
            node.set_refs(keys::ASSOCIATED_WITH, &agent_ids);

            nodes.push(node);
            nodes.extend(sub_nodes);
        }

        StageNodes {
            nodes,
            last_stage: stage_ids.last().cloned(),
        }
    }

    fn agent_ref(&mut self, agent: &Agent, stage_id: &str) -> Option<AgentRef> {
        match agent.kind {
            AgentKind::Person => {
                let person = match (agent.person_id.as_deref(), non_blank(&agent.name)) {
                    (Some(pid), _) if self.person_index.contains_key(pid) => self.person_index[pid].clone(),
                    (_, Some(name)) => self.registry.resolve(&IdentityQuery::named(name)),
                    (pid, None) => {
                        tracing::warn!(stage = stage_id, person_id = ?pid, "Skipping person agent with unknown person");
                        return None;
                    }
                };
                let role = self.registry.assign_role(
                    RoleAssignment::new(person, agent.role.clone(), RoleUsage::StageAgent)
                        .scoped(stage_id)
                        .with_context(agent.role_context.clone()),
                );
                Some(AgentRef::Role(role))
            }
            AgentKind::Organization | AgentKind::Software => {
                let Some(name) = non_blank(&agent.name) else {
                    tracing::warn!(stage = stage_id, kind = ?agent.kind, "Skipping non-person agent without a name");
                    return None;
                };
                let kind = if agent.kind == AgentKind::Organization {
                    EntityKind::Organization
                } else {
                    EntityKind::Software
                };
                let mut node = Node::of_kind(self.next_id("agent"), kind);
                node.set(keys::NAME, name);
                node.set_opt(keys::ROLE_NAME, agent.role.clone());
                node.set_opt(keys::ROLE_CONTEXT, agent.role_context.clone());
                Some(AgentRef::Node(node))
            }
        }
    }

    fn dataset_nodes(&mut self, doc: &CanvasDocument) -> Vec<Node> {
        let datasets: &[Dataset] = doc
            .data_access
            .as_ref()
            .map(|d| d.datasets.as_slice())
            .unwrap_or(&[]);
        let mut nodes = Vec::with_capacity(datasets.len());
        for ds in datasets {
            let id = self.allocate_id("dataset", &ds.id);
            let mut node = Node::new(id.clone(), &[EntityKind::Dataset.primary(), "dcat:Dataset"]);
            node.set(keys::NAME, ds.title.clone());
            node.set(keys::LOCAL_ID, ds.id.clone());
            node.set_opt(keys::DESCRIPTION, ds.description.clone());
            node.set_opt(keys::ENCODING_FORMAT, ds.format.clone());
            set_license(&mut node, non_blank(&ds.license));
            node.set_opt(keys::ACCESS_RIGHTS, ds.access_rights.map(|a| a.as_str()));
            node.set_strings(keys::DUO_TERMS, &ds.duo_terms);
            node.set_opt(keys::IDENTIFIER, ds.identifier.clone());
            node.set_opt(keys::PUBLISHER, ds.publisher.clone());
            if let Some(page) = non_blank(&ds.landing_page) {
                node.set_ref(keys::LANDING_PAGE, page);
            }
            node.set_opt(keys::CONTAINS_PERSONAL_DATA, ds.contains_personal_data);
            node.set_opt(keys::SENSITIVITY_LEVEL, ds.sensitivity_level.clone());
            self.root_parts.push(id);
            nodes.push(node);
        }
        nodes
    }

    fn outcome_nodes(&mut self, doc: &CanvasDocument, last_stage: &Option<String>) -> Vec<Node> {
        let Some(outcomes) = &doc.outcomes else {
            return Vec::new();
        };
        let mut nodes = Vec::new();

        for d in &outcomes.deliverables {
            let id = self.allocate_id("outcome", &d.id);
            let mut node = Node::of_kind(id.clone(), EntityKind::Outcome);
            node.set(keys::NAME, d.title.clone());
            node.set(keys::LOCAL_ID, d.id.clone());
            if !d.kind.is_empty() {
                node.set(keys::ADDITIONAL_TYPE, d.kind.clone());
            }
            node.set_opt(keys::DESCRIPTION, d.description.clone());
            node.set_opt(keys::DATE_CREATED, d.date.clone());
            node.set_opt(keys::IDENTIFIER, d.identifier.clone());
            if let Some(stage) = last_stage {
                node.set_ref(keys::GENERATED_BY, stage);
            }
            self.root_parts.push(id);
            nodes.push(node);
        }

        for p in &outcomes.publications {
            let id = self.allocate_id("publication", &p.id);
            let mut node = Node::of_kind(id.clone(), EntityKind::Publication);
            node.set(keys::NAME, p.title.clone());
            node.set(keys::LOCAL_ID, p.id.clone());
            node.set_opt(keys::IDENTIFIER, p.doi.clone());
            node.set_opt(keys::DATE_PUBLISHED, p.date.clone());
            let authors: Vec<String> = p
                .authors
                .iter()
                .filter(|a| !a.trim().is_empty())
                .map(|a| self.registry.resolve(&IdentityQuery::named(a.trim())))
                .collect();
            node.set_refs(keys::AUTHOR, &authors);
            self.root_parts.push(id);
            nodes.push(node);
        }

        for e in &outcomes.evaluations {
            let id = self.allocate_id("evaluation", &e.id);
            let mut node = Node::of_kind(id.clone(), EntityKind::Evaluation);
            node.set(keys::NAME, e.kind.clone());
            node.set(keys::LOCAL_ID, e.id.clone());
            node.set(keys::EVALUATION_TYPE, e.kind.clone());
            node.set_opt(keys::DESCRIPTION, e.results.clone());
            node.set_opt(keys::DATE_PUBLISHED, e.date.clone());
            node.set_opt(keys::METRICS, e.metrics.clone().map(Value::Object));
            self.root_parts.push(id);
            nodes.push(node);
        }
        nodes
    }

    /// Returns file nodes, side files, and inline root properties.
    fn side_payloads(&mut self, doc: &CanvasDocument) -> (Vec<Node>, Vec<SideFile>, Vec<(&'static str, Value)>) {
        let mut payloads = Vec::new();
        if let Some(display) = &self.options.display_state {
            if let Some(v) = json_of(display, keys::BENEFIT_DISPLAY) {
                payloads.push((keys::BENEFIT_DISPLAY, ids::DISPLAY_FILE, "Benefit display state", v));
            }
        }
        if let Some(feasibility) = &doc.developer_feasibility {
            if let Some(v) = json_of(feasibility, keys::DEVELOPER_FEASIBILITY) {
                payloads.push((keys::DEVELOPER_FEASIBILITY, ids::FEASIBILITY_FILE, "Developer feasibility", v));
            }
        }

        let mut nodes = Vec::new();
        let mut files = Vec::new();
        let mut inline = Vec::new();
        for (key, path, name, value) in payloads {
            match self.options.config.side_payload_mode {
                SidePayloadMode::Inline => inline.push((key, value)),
                SidePayloadMode::Files => {
                    let file = SideFile::new(path, value);
                    let mut node = Node::of_kind(path, EntityKind::File);
                    node.set(keys::NAME, name);
                    node.set(keys::ENCODING_FORMAT, JSON_MEDIA_TYPE);
                    node.set(keys::CONTENT_SIZE, to_canonical_bytes(&file.content).len());
                    node.set(keys::SHA256, file.sha256.clone());
                    self.root_parts.push(path.to_string());
                    nodes.push(node);
                    files.push(file);
                }
            }
        }
        (nodes, files, inline)
    }
}

struct StageNodes {
    nodes: Vec<Node>,
    last_stage: Option<String>,
}

enum AgentRef {
    Role(String),
    Node(Node),
}
