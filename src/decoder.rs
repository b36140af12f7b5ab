//! Graph Decoder.
//!
//! Reads a flat node list back into a canonical document. The result is not
//! yet normalized; run it through [`crate::normalize`] before use.
//!
//! ## Lookup
//!
//! | Entity | Found by |
//! |--------|----------|
//! | descriptor, root | fixed id |
//! | project | root `about`, else type scan |
//! | steps | plan `p-plan:hasStep`, else type scan |
//! | stages, datasets, outcomes, persons, roles | type scan |
//!
//! Every field is read by its current key first, then by historical keys in
//! a fixed order. Every reference is read as a list. References to ids that
//! are not in the graph are dropped. Unknown node types and unknown fields
//! are ignored.

use std::collections::{HashMap, HashSet};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::canonical::{check_payload_digest, DigestCheck};
use crate::error::DecodeError;
use crate::graph::{ids, keys, EntityKind, GraphContainer, Node};
use crate::identity::RoleUsage;
use crate::types::{
    AccessRights, Agent, AgentKind, Benefit, BenefitKind, CanvasDocument, DataAccess, Dataset,
    Deliverable, DisplayState, Evaluation, Governance, GovernanceStage,
    Lenient, Milestone, Outcomes, Person, Priority, Project, Publication, Stakeholder, Task,
    TaskStatus, UnitCategory, UserExpectations,
};

/// Decoded document plus side state that does not live in the document.
#[derive(Debug, Clone, Default)]
pub struct DecodedCrate {
    /// The reconstructed document.
    pub document: CanvasDocument,
    /// Display-group state, if the crate carried one.
    pub display_state: Option<DisplayState>,
    /// Schema-version tag on the root, if any.
    pub schema_version: Option<String>,
}

/// Decode a container into a document.
pub fn decode(container: &GraphContainer) -> Result<CanvasDocument, DecodeError> {
    GraphDecoder::new(container).decode().map(|c| c.document)
}

/// Decode a container together with externally packaged side files.
pub fn decode_crate(
    container: &GraphContainer,
    side_files: &HashMap<String, Value>,
) -> Result<DecodedCrate, DecodeError> {
    GraphDecoder::new(container).with_side_files(side_files).decode()
}

fn local_id(node: &Node) -> String {
    node.str_field(keys::LOCAL_ID)
        .map(str::to_string)
        .unwrap_or_else(|| node.id.trim_start_matches('#').to_string())
}

fn owned(s: Option<&str>) -> Option<String> {
    s.map(str::to_string)
}

/// Date part of an ISO timestamp.
fn date_part(timestamp: &str) -> String {
    timestamp.split('T').next().unwrap_or(timestamp).to_string()
}

fn parse_lenient<T, F>(raw: Option<&str>, parse: F) -> Option<Lenient<T>>
where
    F: Fn(&str) -> Option<T>,
{
    raw.map(|s| match parse(s) {
        Some(v) => Lenient::Known(v),
        None => Lenient::Unrecognized(s.to_string()),
    })
}

/// Graph decoder over one container.
pub struct GraphDecoder<'g> {
    container: &'g GraphContainer,
    index: HashMap<&'g str, &'g Node>,
    side_files: Option<&'g HashMap<String, Value>>,
    /// Ids never treated as content: descriptor, root, file descriptors.
    excluded: HashSet<&'g str>,
}

impl<'g> GraphDecoder<'g> {
    /// Create a decoder.
    pub fn new(container: &'g GraphContainer) -> Self {
        let mut index = HashMap::with_capacity(container.nodes.len());
        for node in &container.nodes {
            index.entry(node.id.as_str()).or_insert(node);
        }
        Self {
            container,
            index,
            side_files: None,
            excluded: HashSet::new(),
        }
    }

    /// Supply externally packaged side files, keyed by path.
    pub fn with_side_files(mut self, files: &'g HashMap<String, Value>) -> Self {
        self.side_files = Some(files);
        self
    }

    /// Resolve a reference, dropping it when the target is absent.
    fn resolve(&self, id: &str) -> Option<&'g Node> {
        let node = self.index.get(id).copied();
        if node.is_none() {
            tracing::debug!(target_id = id, "Dropping reference to missing node");
        }
        node
    }

    fn resolve_all(&self, ids: Vec<String>) -> Vec<&'g Node> {
        ids.iter().filter_map(|id| self.resolve(id)).collect()
    }

    fn content_nodes(&self, kind: EntityKind) -> impl Iterator<Item = &'g Node> + '_ {
        self.container
            .nodes
            .iter()
            .filter(move |n| n.is(kind) && !self.excluded.contains(n.id.as_str()))
    }

    /// An IRI-valued field: reference object, bare string, or first of an array.
    fn iri_or_str(node: &Node, key: &str) -> Option<String> {
        match node.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Object(obj) => obj.get("@id").and_then(Value::as_str).map(str::to_string),
            Value::Array(items) => items.first().and_then(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Object(obj) => obj.get("@id").and_then(Value::as_str).map(str::to_string),
                _ => None,
            }),
            _ => None,
        }
    }

    /// A name-valued field that may also be a reference to a named node.
    fn name_or_ref(&self, node: &Node, key: &str) -> Option<String> {
        if let Some(s) = node.str_field(key) {
            return Some(s.to_string());
        }
        node.refs(key)
            .first()
            .and_then(|id| self.resolve(id))
            .and_then(|n| owned(n.str_field(keys::NAME)))
    }

    fn parse_field<T: DeserializeOwned>(node: &Node, key: &str) -> Option<T> {
        let value = node.get(key)?;
        match serde_json::from_value(value.clone()) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(node = %node.id, field = key, error = %e, "Ignoring unreadable field");
                None
            }
        }
    }

    /// Decode the container.
    pub fn decode(mut self) -> Result<DecodedCrate, DecodeError> {
        if self.container.context.is_null() {
            return Err(DecodeError::MissingContext);
        }
        if !self.container.context.to_string().contains("\"aac") {
            tracing::debug!("Context does not bind the local vocabulary prefix");
        }

        let root_id = self
            .index
            .get(ids::DESCRIPTOR)
            .and_then(|d| d.refs(keys::ABOUT).into_iter().next())
            .unwrap_or_else(|| ids::ROOT.to_string());
        let root = self.index.get(root_id.as_str()).copied();

        self.excluded.insert(ids::DESCRIPTOR);
        if let Some(r) = root {
            self.excluded.insert(r.id.as_str());
        }
        let file_ids: Vec<&'g str> = self
            .container
            .nodes
            .iter()
            .filter(|n| n.is(EntityKind::File))
            .map(|n| n.id.as_str())
            .collect();
        self.excluded.extend(file_ids);

        let project_node = root
            .and_then(|r| {
                r.first_refs(&[keys::ABOUT, keys::MAIN_ENTITY])
                    .into_iter()
                    .filter_map(|id| self.index.get(id.as_str()).copied())
                    .find(|n| n.is(EntityKind::Project))
            })
            .or_else(|| self.content_nodes(EntityKind::Project).next());

        let person_locals = self.person_locals();
        let mut document = CanvasDocument {
            project: self.project(project_node, root),
            ..Default::default()
        };

        document.persons = self.persons(&person_locals);
        let tasks = self.tasks(&person_locals);
        let stakeholders = self.stakeholders(project_node, &person_locals);
        if !tasks.is_empty() || !stakeholders.is_empty() {
            document.user_expectations = Some(UserExpectations {
                requirements: tasks,
                stakeholders,
            });
        }

        let (stages, milestone_ids) = self.stages(&person_locals);
        if !stages.is_empty() {
            document.governance = Some(Governance { stages });
        }

        let datasets = self.datasets();
        let mut license_ids: HashSet<String> = HashSet::new();
        for node in root.into_iter().chain(project_node) {
            license_ids.extend(Self::iri_or_str(node, keys::LICENSE));
        }
        license_ids.extend(datasets.iter().filter_map(|d| d.license.clone()));
        if !datasets.is_empty() {
            document.data_access = Some(DataAccess { datasets });
        }

        let outcomes = self.outcomes(&milestone_ids, &license_ids);
        if !outcomes.is_empty() {
            document.outcomes = Some(outcomes);
        }

        let mut schema_version = None;
        if let Some(r) = root {
            document.version = owned(r.str_field(keys::VERSION));
            document.version_date = owned(r.str_field(keys::VERSION_DATE));
            schema_version = owned(r.str_field(keys::SCHEMA_VERSION));
        }
        document.developer_feasibility =
            self.side_payload(root, keys::DEVELOPER_FEASIBILITY, ids::FEASIBILITY_FILE);
        let display_state = self.side_payload(root, keys::BENEFIT_DISPLAY, ids::DISPLAY_FILE);

        tracing::info!(
            nodes = self.container.nodes.len(),
            tasks = document.tasks().len(),
            persons = document.persons.len(),
            stages = document.governance.as_ref().map_or(0, |g| g.stages.len()),
            fingerprint = %self.container.fingerprint(),
            "Decoded canvas crate"
        );

        Ok(DecodedCrate {
            document,
            display_state,
            schema_version,
        })
    }

    fn project(&self, node: Option<&'g Node>, root: Option<&'g Node>) -> Project {
        let mut project = Project::default();
        let fallback = |key: &str| root.and_then(|r| owned(r.str_field(key)));

        let Some(n) = node else {
            project.title = fallback(keys::NAME).unwrap_or_default();
            project.description = fallback(keys::DESCRIPTION).unwrap_or_default();
            return project;
        };

        project.title = owned(n.str_field(keys::NAME))
            .or_else(|| fallback(keys::NAME))
            .unwrap_or_default();
        project.description = owned(n.str_field(keys::DESCRIPTION))
            .or_else(|| fallback(keys::DESCRIPTION))
            .unwrap_or_default();
        // Older exports carried the objective as a plain-text `about`.
        project.objective = owned(n.first_str(&[keys::OBJECTIVE, keys::ABOUT]));
        project.project_stage = owned(n.str_field(keys::PROJECT_STAGE));
        project.start_date = owned(n.str_field(keys::START_DATE));
        project.end_date = owned(n.str_field(keys::END_DATE));
        project.domain = n.strings(keys::DOMAIN);
        project.keywords = match n.get(keys::KEYWORDS) {
            Some(Value::String(s)) => s
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .collect(),
            _ => n.strings(keys::KEYWORDS),
        };
        project.identifier = owned(n.str_field(keys::IDENTIFIER));
        project.license = Self::iri_or_str(n, keys::LICENSE)
            .or_else(|| root.and_then(|r| Self::iri_or_str(r, keys::LICENSE)));
        project.funding_grant = owned(n.str_field(keys::FUNDING_GRANT));
        project.lead_organization = self.name_or_ref(n, keys::LEAD_ORGANIZATION);
        project.headline_value = owned(n.str_field(keys::HEADLINE_VALUE));
        project.primary_value_driver =
            parse_lenient(n.str_field(keys::PRIMARY_VALUE_DRIVER), BenefitKind::from_str);
        project.version = owned(n.str_field(keys::VERSION));
        project.version_date = owned(n.str_field(keys::VERSION_DATE));
        project
    }

    /// Person node id -> document person id.
    fn person_locals(&self) -> HashMap<&'g str, String> {
        self.content_nodes(EntityKind::Person)
            .map(|n| (n.id.as_str(), local_id(n)))
            .collect()
    }

    fn person_ids(&self, refs: Vec<String>, locals: &HashMap<&'g str, String>) -> Vec<String> {
        self.resolve_all(refs)
            .into_iter()
            .filter_map(|n| locals.get(n.id.as_str()).cloned())
            .collect()
    }

    fn persons(&self, locals: &HashMap<&'g str, String>) -> Vec<Person> {
        let author_refs: HashSet<String> = self
            .container
            .nodes
            .iter()
            .filter(|n| n.is(EntityKind::Publication))
            .flat_map(|n| n.refs(keys::AUTHOR))
            .collect();

        self.content_nodes(EntityKind::Person)
            .filter(|n| n.has(keys::LOCAL_ID) || !author_refs.contains(&n.id))
            .map(|n| {
                let external_id = owned(n.str_field(keys::IDENTIFIER))
                    .or_else(|| n.id.starts_with("https://orcid.org/").then(|| n.id.clone()));
                Person {
                    id: locals.get(n.id.as_str()).cloned().unwrap_or_else(|| local_id(n)),
                    name: owned(n.str_field(keys::NAME)).unwrap_or_default(),
                    affiliation: self.name_or_ref(n, keys::AFFILIATION),
                    external_id,
                    local_title: owned(n.str_field(keys::JOB_TITLE)),
                    local_titles: None,
                }
            })
            .collect()
    }

    fn stakeholders(
        &self,
        project: Option<&'g Node>,
        locals: &HashMap<&'g str, String>,
    ) -> Vec<Stakeholder> {
        let from_roles: Vec<Stakeholder> = self
            .content_nodes(EntityKind::Role)
            .filter(|n| {
                n.str_field(keys::USAGE_CONTEXT).and_then(RoleUsage::from_str)
                    == Some(RoleUsage::Stakeholder)
            })
            .filter_map(|n| {
                let person_id = self.person_ids(n.refs(keys::PERSON), locals).into_iter().next()?;
                Some(Stakeholder {
                    person_id,
                    role: owned(n.first_str(&[keys::ROLE_NAME, keys::NAME])),
                    values: n.strings(keys::VALUES),
                    role_context: owned(n.str_field(keys::ROLE_CONTEXT)),
                })
            })
            .collect();
        if !from_roles.is_empty() {
            return from_roles;
        }

        // Older exports listed stakeholders as contributors with an embedded role.
        let Some(project) = project else {
            return Vec::new();
        };
        self.resolve_all(project.refs(keys::CONTRIBUTOR))
            .into_iter()
            .filter(|n| n.is(EntityKind::Person))
            .filter_map(|n| {
                Some(Stakeholder {
                    person_id: locals.get(n.id.as_str())?.clone(),
                    role: owned(n.first_str(&[keys::ROLE_NAME, keys::ROLE])),
                    ..Default::default()
                })
            })
            .collect()
    }

    fn tasks(&self, locals: &HashMap<&'g str, String>) -> Vec<Task> {
        let plan = self.content_nodes(EntityKind::Plan).next();
        let planned: Vec<&'g Node> = plan
            .map(|p| self.resolve_all(p.first_refs(&[keys::HAS_STEP, keys::HAS_PART])))
            .unwrap_or_default()
            .into_iter()
            .filter(|n| n.is(EntityKind::Step))
            .collect();
        let steps: Vec<&'g Node> = if planned.is_empty() {
            self.content_nodes(EntityKind::Step).collect()
        } else {
            planned
        };

        let step_locals: HashMap<&str, String> =
            steps.iter().map(|n| (n.id.as_str(), local_id(n))).collect();

        steps
            .iter()
            .map(|n| self.task(n, locals, &step_locals))
            .collect()
    }

    fn task(
        &self,
        n: &Node,
        locals: &HashMap<&'g str, String>,
        step_locals: &HashMap<&str, String>,
    ) -> Task {
        let benefits = match n.get(keys::BENEFITS) {
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .filter_map(|(i, b)| match serde_json::from_value::<Benefit>(b.clone()) {
                    Ok(benefit) => Some(benefit),
                    Err(e) => {
                        tracing::warn!(step = %n.id, index = i, error = %e, "Skipping unreadable benefit");
                        None
                    }
                })
                .collect(),
            _ => Vec::new(),
        };

        let mut depends_on = n.strings(keys::DEPENDS_ON);
        if depends_on.is_empty() {
            depends_on = self
                .resolve_all(n.refs(keys::IS_PRECEDED_BY))
                .into_iter()
                .filter_map(|p| step_locals.get(p.id.as_str()).cloned())
                .collect();
        }

        // Steps without a local id or title key come from the first exporter,
        // which wrote the user story into `name`.
        let (title, user_story) = if n.has(keys::LOCAL_ID) || n.has(keys::TITLE) {
            (
                owned(n.first_str(&[keys::NAME, "schema:name", keys::TITLE])),
                owned(n.str_field(keys::USER_STORY)),
            )
        } else {
            (None, owned(n.first_str(&[keys::USER_STORY, keys::NAME])))
        };

        Task {
            id: local_id(n),
            title: title.unwrap_or_default(),
            description: owned(n.str_field(keys::DESCRIPTION)),
            user_story,
            priority: n.first_str(&[keys::PRIORITY, "priority"]).and_then(Priority::from_str),
            status: n.first_str(&[keys::STATUS, "status"]).and_then(TaskStatus::from_str),
            unit_of_work: owned(n.str_field(keys::UNIT_OF_WORK)),
            unit_category: parse_lenient(n.str_field(keys::UNIT_CATEGORY), UnitCategory::from_str),
            volume_per_month: n.number_field(keys::VOLUME_PER_MONTH),
            time_unit: Self::parse_field(n, keys::TIME_UNIT),
            benefits,
            depends_on,
            stakeholders: self.person_ids(n.refs(keys::STAKEHOLDER), locals),
            feasibility: Self::parse_field(n, keys::FEASIBILITY),
            human_oversight_minutes_per_unit: n.number_field(keys::OVERSIGHT_PER_UNIT),
        }
    }

    /// Stages in graph order, plus every id referenced as a milestone.
    fn stages(&self, locals: &HashMap<&'g str, String>) -> (Vec<GovernanceStage>, HashSet<String>) {
        let mut milestone_ids = HashSet::new();
        let stages: Vec<GovernanceStage> = self
            .content_nodes(EntityKind::Stage)
            .map(|n| {
                let milestone_refs = n.first_refs(&[keys::HAS_MILESTONE, "hasMilestone"]);
                milestone_ids.extend(milestone_refs.iter().cloned());
                let milestones = self
                    .resolve_all(milestone_refs)
                    .into_iter()
                    .map(|m| {
                        let name = m.str_field(keys::NAME);
                        let description = m.str_field(keys::DESCRIPTION);
                        match name {
                            Some(name) => Milestone {
                                description: name.to_string(),
                                kpi: owned(m.str_field(keys::KPI)).or_else(|| owned(description)),
                            },
                            None => Milestone {
                                description: description.unwrap_or_default().to_string(),
                                kpi: owned(m.str_field(keys::KPI)),
                            },
                        }
                    })
                    .collect();

                let agents = self
                    .resolve_all(n.first_refs(&[keys::ASSOCIATED_WITH, "wasAssociatedWith"]))
                    .into_iter()
                    .filter_map(|a| self.agent(a, locals))
                    .collect();

                let mut compliance = n.strings(keys::COMPLIANCE_STANDARD);
                if compliance.is_empty() {
                    compliance = n.strings("complianceStandard");
                }

                GovernanceStage {
                    id: local_id(n),
                    name: owned(n.str_field(keys::NAME)).unwrap_or_default(),
                    start_date: n.first_str(&[keys::STARTED_AT, "startedAtTime"]).map(date_part),
                    end_date: n.first_str(&[keys::ENDED_AT, "endedAtTime"]).map(date_part),
                    agents,
                    milestones,
                    compliance_standards: compliance,
                }
            })
            .collect();
        (stages, milestone_ids)
    }

    fn agent(&self, node: &Node, locals: &HashMap<&'g str, String>) -> Option<Agent> {
        if node.is(EntityKind::Role) {
            let person_id = self.person_ids(node.refs(keys::PERSON), locals).into_iter().next()?;
            return Some(Agent {
                person_id: Some(person_id),
                role: owned(node.first_str(&[keys::ROLE_NAME, keys::NAME])),
                kind: AgentKind::Person,
                role_context: owned(node.str_field(keys::ROLE_CONTEXT)),
                name: None,
            });
        }
        if node.is(EntityKind::Person) {
            return Some(Agent {
                person_id: locals.get(node.id.as_str()).cloned(),
                role: owned(node.first_str(&[keys::ROLE_NAME, keys::ROLE])),
                kind: AgentKind::Person,
                ..Default::default()
            });
        }
        let kind = if node.is(EntityKind::Organization) {
            AgentKind::Organization
        } else if node.is(EntityKind::Software) {
            AgentKind::Software
        } else {
            tracing::debug!(node = %node.id, types = ?node.types, "Ignoring agent of unknown type");
            return None;
        };
        Some(Agent {
            person_id: None,
            name: owned(node.str_field(keys::NAME)),
            role: owned(node.first_str(&[keys::ROLE_NAME, keys::ROLE])),
            kind,
            role_context: owned(node.str_field(keys::ROLE_CONTEXT)),
        })
    }

    fn datasets(&self) -> Vec<Dataset> {
        self.content_nodes(EntityKind::Dataset)
            .filter(|n| !n.is(EntityKind::Project))
            .map(|n| {
                let mut access_rights = None;
                let mut duo_terms = n.strings(keys::DUO_TERMS);
                let rights = n.get(keys::ACCESS_RIGHTS).or_else(|| n.get("accessRights"));
                let entries: Vec<&Value> = match rights {
                    Some(Value::Array(items)) => items.iter().collect(),
                    Some(v) => vec![v],
                    None => Vec::new(),
                };
                for entry in entries {
                    match entry {
                        Value::String(s) => match AccessRights::from_str(s) {
                            Some(a) if access_rights.is_none() => access_rights = Some(a),
                            Some(_) => {}
                            None => duo_terms.push(s.clone()),
                        },
                        Value::Object(obj) => {
                            if let Some(term) = obj.get("@id").and_then(Value::as_str) {
                                duo_terms.push(term.to_string());
                            }
                        }
                        _ => {}
                    }
                }

                Dataset {
                    id: local_id(n),
                    title: owned(n.str_field(keys::NAME)).unwrap_or_default(),
                    description: owned(n.str_field(keys::DESCRIPTION)),
                    format: owned(n.first_str(&[keys::ENCODING_FORMAT, "format"])),
                    license: Self::iri_or_str(n, keys::LICENSE),
                    access_rights,
                    duo_terms,
                    identifier: owned(n.str_field(keys::IDENTIFIER)),
                    publisher: self.name_or_ref(n, keys::PUBLISHER),
                    landing_page: Self::iri_or_str(n, keys::LANDING_PAGE),
                    contains_personal_data: n.bool_field(keys::CONTAINS_PERSONAL_DATA),
                    sensitivity_level: owned(n.str_field(keys::SENSITIVITY_LEVEL)),
                }
            })
            .collect()
    }

    fn outcomes(&self, milestone_ids: &HashSet<String>, license_ids: &HashSet<String>) -> Outcomes {
        let mut outcomes = Outcomes::default();
        for n in &self.container.nodes {
            if self.excluded.contains(n.id.as_str())
                || milestone_ids.contains(&n.id)
                || license_ids.contains(&n.id)
                || n.is(EntityKind::Milestone)
            {
                continue;
            }
            let is_evaluation = n.is(EntityKind::Evaluation) || n.has(keys::EVALUATION_TYPE);
            if is_evaluation {
                outcomes.evaluations.push(Evaluation {
                    id: local_id(n),
                    kind: owned(n.first_str(&[keys::EVALUATION_TYPE, keys::NAME])).unwrap_or_default(),
                    date: owned(n.first_str(&[keys::DATE_PUBLISHED, keys::DATE_CREATED])),
                    metrics: n.get(keys::METRICS).and_then(Value::as_object).cloned(),
                    results: owned(n.str_field(keys::DESCRIPTION)),
                });
            } else if (n.is(EntityKind::Publication) || n.is(EntityKind::Outcome))
                && n.str_field(keys::NAME).map_or(true, |name| name.trim().is_empty())
            {
                tracing::debug!(node = %n.id, "Skipping untitled outcome");
            } else if n.is(EntityKind::Publication) {
                outcomes.publications.push(Publication {
                    id: local_id(n),
                    title: owned(n.str_field(keys::NAME)).unwrap_or_default(),
                    doi: owned(n.str_field(keys::IDENTIFIER)),
                    authors: self.authors(n),
                    date: owned(n.str_field(keys::DATE_PUBLISHED)),
                });
            } else if n.is(EntityKind::Outcome) {
                outcomes.deliverables.push(Deliverable {
                    id: local_id(n),
                    title: owned(n.str_field(keys::NAME)).unwrap_or_default(),
                    kind: owned(n.str_field(keys::ADDITIONAL_TYPE)).unwrap_or_default(),
                    description: owned(n.str_field(keys::DESCRIPTION)),
                    date: owned(n.first_str(&[keys::DATE_CREATED, keys::DATE_PUBLISHED])),
                    identifier: owned(n.str_field(keys::IDENTIFIER)),
                });
            }
        }
        outcomes
    }

    /// Author names from references, inline person objects or plain names.
    fn authors(&self, n: &Node) -> Vec<String> {
        let entries: Vec<&Value> = match n.get(keys::AUTHOR) {
            Some(Value::Array(items)) => items.iter().collect(),
            Some(v) => vec![v],
            None => return Vec::new(),
        };
        entries
            .into_iter()
            .filter_map(|entry| match entry {
                Value::String(s) => match self.index.get(s.as_str()) {
                    Some(person) => owned(person.str_field(keys::NAME)),
                    None => Some(s.clone()),
                },
                Value::Object(obj) => match obj.get("@id").and_then(Value::as_str) {
                    Some(id) => self.resolve(id).and_then(|p| owned(p.str_field(keys::NAME))),
                    None => obj.get(keys::NAME).and_then(Value::as_str).map(str::to_string),
                },
                _ => None,
            })
            .collect()
    }

    /// A side payload, inline on the root or in a described side file.
    fn side_payload<T: DeserializeOwned>(&self, root: Option<&'g Node>, inline_key: &str, path: &str) -> Option<T> {
        if let Some(r) = root {
            if r.has(inline_key) {
                return Self::parse_field(r, inline_key);
            }
        }
        let descriptor = self.index.get(path)?;
        let Some(content) = self.side_files.and_then(|files| files.get(path)) else {
            tracing::warn!(path, "Side file is described in the crate but was not supplied");
            return None;
        };
        match check_payload_digest(content, descriptor.str_field(keys::SHA256)) {
            DigestCheck::Valid | DigestCheck::Missing => {}
            DigestCheck::Mismatch { expected, computed } => {
                tracing::warn!(path, %expected, %computed, "Side file digest mismatch; using it anyway");
            }
        }
        match serde_json::from_value(content.clone()) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(path, error = %e, "Ignoring unreadable side file");
                None
            }
        }
    }
}
