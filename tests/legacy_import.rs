//! Importing crates written by older exporters, and structural failures.

use std::collections::HashMap;

use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use canvas_crate::types::{
    AccessRights, Agent, AgentKind, Dataset, Deliverable, Lenient, MigrationKind, Person, Priority,
    Publication, TaskStatus, UnitCategory,
};
use canvas_crate::{decode, import_container, import_json, DecodeError, GraphContainer};

fn container(value: Value) -> GraphContainer {
    GraphContainer::from_value(&value).unwrap()
}

/// Root dataset plus one project entity, as the authoring tool wrote them.
fn minimal_crate(context: &str) -> Value {
    json!({
        "@context": context,
        "@graph": [
            {
                "@id": "ro-crate-metadata.json",
                "@type": "schema:CreativeWork",
                "conformsTo": {"@id": "https://w3id.org/ro/crate/1.1"},
                "about": {"@id": "./"}
            },
            {
                "@id": "./",
                "@type": ["schema:Dataset", "dcat:Dataset"],
                "name": "Legacy Crate",
                "aac:version": "0.1.0",
                "aac:versionDate": "2025-01-01",
                "about": {"@id": "#project"}
            },
            {
                "@id": "#project",
                "@type": ["schema:Project", "schema:ResearchProject"],
                "name": "Legacy Project Title",
                "description": "Legacy description",
                "aac:version": "0.1.0",
                "aac:versionDate": "2025-01-01"
            }
        ]
    })
}

/// An older full export: bare type tags, embedded roles, unprefixed keys.
fn legacy_crate() -> Value {
    json!({
        "@context": "https://w3id.org/ro/crate/1.1/context",
        "@graph": [
            {
                "@id": "ro-crate-metadata.json",
                "@type": "CreativeWork",
                "about": {"@id": "./"}
            },
            {
                "@id": "./",
                "@type": "Dataset",
                "name": "Old Export",
                "about": {"@id": "#project"},
                "aac:version": "0.3.0"
            },
            {
                "@id": "#project",
                "@type": "Project",
                "name": "Claims Triage",
                "description": "Route incoming claims",
                "keywords": "claims, triage , ",
                "aac:primaryValueDriver": "speed",
                "contributor": [{"@id": "#person-ana"}],
                "hasPlan": {"@id": "#user-plan"}
            },
            {
                "@id": "#user-plan",
                "@type": "Plan",
                "hasPart": [{"@id": "#req-1"}, {"@id": "#req-2"}, {"@id": "#missing"}]
            },
            {
                "@id": "#req-1",
                "@type": "Step",
                "description": "Classify claim type",
                "aac:unitCategory": "document",
                "aac:volumePerMonth": "250",
                "aac:humanOversightMinutesPerUnit": 1.5,
                "aac:benefits": [{
                    "benefitType": "time",
                    "metricId": "processingTime",
                    "direction": "decreaseIsBetter",
                    "valueMeaning": "absolute",
                    "benefitUnit": "minutes",
                    "baseline": {"type": "numeric", "value": 8},
                    "expected": {"type": "numeric", "value": 2}
                }]
            },
            {
                "@id": "#req-2",
                "@type": "Step",
                "aac:title": "Assign adjuster",
                "aac:unitCategory": "widget",
                "p-plan:isPrecededBy": {"@id": "#req-1"},
                "aac:stakeholder": {"@id": "#person-ana"}
            },
            {
                "@id": "#stage-1",
                "@type": "Activity",
                "name": "Pilot",
                "startedAtTime": "2024-01-01T00:00:00Z",
                "endedAtTime": "2024-03-31T23:59:59Z",
                "wasAssociatedWith": [
                    {"@id": "https://orcid.org/0000-0003-1415-9269"},
                    {"@id": "#org-audit"},
                    {"@id": "#unknown-kind"}
                ],
                "hasMilestone": {"@id": "#ms-1"},
                "complianceStandard": ["ISO 27001"]
            },
            {
                "@id": "#ms-1",
                "@type": "CreativeWork",
                "name": "Pilot sign-off",
                "description": "90% routed correctly"
            },
            {
                "@id": "#org-audit",
                "@type": "Organization",
                "name": "Internal Audit",
                "role": "Observer"
            },
            {
                "@id": "#unknown-kind",
                "@type": "Thing",
                "name": "Mystery"
            },
            {
                "@id": "#claims-data",
                "@type": "Dataset",
                "name": "Historic claims",
                "format": "text/csv",
                "accessRights": ["restricted", {"@id": "DUO:0000042"}, "DUO:0000006"],
                "aac:containsPersonalData": "true"
            },
            {
                "@id": "#paper",
                "@type": "ScholarlyArticle",
                "name": "Triage at scale",
                "identifier": "10.1000/xyz",
                "author": [{"@type": "Person", "name": "Grace Hopper"}, "Alan Turing"]
            },
            {
                "@id": "#person-ana",
                "@type": "Person",
                "name": "Ana Silva",
                "role": "Sponsor",
                "affiliation": "Claims Dept"
            },
            {
                "@id": "https://orcid.org/0000-0003-1415-9269",
                "@type": "Person",
                "name": "Ravi Kumar",
                "role": "Reviewer"
            },
            {"name": "entry without an id"}
        ]
    })
}

/// The shape the first web exporter wrote: user story in the step `name`,
/// inline step objects under `p-plan:hasStep`, per-stage `#agent-i-j`
/// entities with an embedded role, inline author objects.
fn first_exporter_crate() -> Value {
    json!({
        "@context": "https://w3id.org/ro/crate/1.1/context",
        "@graph": [
            {
                "@id": "ro-crate-metadata.json",
                "@type": "CreativeWork",
                "conformsTo": {"@id": "https://w3id.org/ro/crate/1.1"},
                "about": {"@id": "./"}
            },
            {
                "@id": "./",
                "@type": "Dataset",
                "name": "Invoice Automation",
                "description": "Automate invoice keying",
                "about": {"@id": "#project"},
                "hasPart": [{"@id": "#dataset-0"}, {"@id": "#outcome-0"}, {"@id": "#publication-0"}]
            },
            {
                "@id": "#project",
                "@type": ["Project", "ResearchProject"],
                "name": "Invoice Automation",
                "description": "Automate invoice keying",
                "about": "Cut manual keying by half",
                "startDate": "2025-01-01",
                "endDate": "2025-12-31",
                "keywords": ["finance", "ocr"],
                "identifier": "PRJ-7",
                "hasPlan": {"@id": "#user-plan"}
            },
            {
                "@id": "#requirement-0",
                "@type": "p-plan:Step",
                "description": "Read PDFs",
                "name": "As a clerk I want fields extracted",
                "priority": "high",
                "status": "in-progress"
            },
            {
                "@id": "#requirement-1",
                "@type": "p-plan:Step",
                "description": "Post to ledger",
                "priority": "low"
            },
            {
                "@id": "#user-plan",
                "@type": ["Plan", "p-plan:Plan"],
                "name": "User Expectations Plan",
                "description": "User requirements and expectations for the automation",
                "p-plan:hasStep": [
                    {"@id": "#requirement-0", "@type": "p-plan:Step", "description": "As a clerk I want fields extracted"},
                    {"@id": "#requirement-1", "@type": "p-plan:Step", "description": "Post to ledger"}
                ]
            },
            {"@id": "#agent-0-0", "@type": "Person", "name": "Dana Ruiz", "role": "Reviewer"},
            {"@id": "#agent-0-1", "@type": "Organization", "name": "Audit Office", "role": "Oversight"},
            {
                "@id": "#stage-0",
                "@type": "Activity",
                "name": "Pilot",
                "startedAtTime": "2025-01-06T00:00:00Z",
                "endedAtTime": "2025-02-28T23:59:59Z",
                "wasAssociatedWith": [{"@id": "#agent-0-0"}, {"@id": "#agent-0-1"}]
            },
            {"@id": "#agent-1-0", "@type": "SoftwareApplication", "name": "OCR Engine"},
            {
                "@id": "#stage-1",
                "@type": "Activity",
                "name": "Rollout",
                "wasAssociatedWith": {"@id": "#agent-1-0"},
                "wasInformedBy": {"@id": "#stage-0"}
            },
            {
                "@id": "#dataset-0",
                "@type": "Dataset",
                "name": "Invoices 2024",
                "description": "Scanned supplier invoices",
                "format": "application/pdf",
                "license": {"@id": "https://creativecommons.org/licenses/by/4.0/"},
                "accessRights": ["restricted", {"@id": "DUO:0000007"}],
                "identifier": "doi:10.5555/inv"
            },
            {
                "@id": "#outcome-0",
                "@type": "CreativeWork",
                "name": "Extraction service",
                "description": "Deployed extractor",
                "datePublished": "2025-03-01",
                "identifier": "https://example.org/svc",
                "wasGeneratedBy": {"@id": "#stage-1"}
            },
            {
                "@id": "#outcome-1",
                "@type": "CreativeWork",
                "description": "Deliverable saved without a title",
                "wasGeneratedBy": {"@id": "#stage-1"}
            },
            {
                "@id": "#publication-0",
                "@type": "ScholarlyArticle",
                "name": "Keying less",
                "identifier": "10.1234/kl",
                "author": [{"@type": "Person", "name": "Dana Ruiz"}, {"@type": "Person", "name": "Lee Wong"}],
                "datePublished": "2025-04-01"
            }
        ]
    })
}

#[test]
fn test_minimal_crates_both_versions() {
    for context in [
        "https://w3id.org/ro/crate/1.2/context",
        "https://w3id.org/ro/crate/1.1/context",
    ] {
        let doc = decode(&container(minimal_crate(context))).unwrap();
        assert_eq!(doc.project.title, "Legacy Project Title");
        assert_eq!(doc.project.description, "Legacy description");
        assert_eq!(doc.project.version.as_deref(), Some("0.1.0"));
        assert_eq!(doc.version.as_deref(), Some("0.1.0"));
        assert!(doc.user_expectations.is_none());
    }
}

#[test]
fn test_legacy_project_and_stakeholders() {
    let imported = import_container(&container(legacy_crate()), &HashMap::new()).unwrap();
    let doc = &imported.document;

    assert_eq!(doc.project.title, "Claims Triage");
    assert_eq!(doc.project.keywords, vec!["claims", "triage"]);
    assert_eq!(doc.project.primary_value_driver, None);
    assert_eq!(doc.version.as_deref(), Some("0.3.0"));

    let stakeholders = doc.stakeholders();
    assert_eq!(stakeholders.len(), 1);
    assert_eq!(stakeholders[0].person_id, "person-ana");
    assert_eq!(stakeholders[0].role.as_deref(), Some("Sponsor"));

    let ids: Vec<&str> = doc.persons.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["person-ana", "https://orcid.org/0000-0003-1415-9269"]);
    assert_eq!(doc.persons[0].affiliation.as_deref(), Some("Claims Dept"));
    assert_eq!(
        doc.persons[1].external_id.as_deref(),
        Some("https://orcid.org/0000-0003-1415-9269")
    );
}

#[test]
fn test_legacy_tasks_normalized() {
    let imported = import_container(&container(legacy_crate()), &HashMap::new()).unwrap();
    let tasks = imported.document.tasks();
    assert_eq!(tasks.len(), 2);

    let first = &tasks[0];
    assert_eq!(first.id, "req-1");
    assert_eq!(first.title, "Classify claim type");
    assert_eq!(first.description, None);
    assert_eq!(first.unit_category, Some(Lenient::Known(UnitCategory::Item)));
    assert_eq!(first.volume_per_month, Some(250.0));
    assert_eq!(first.human_oversight_minutes_per_unit, None);
    assert_eq!(first.benefits[0].oversight_minutes_per_unit, Some(1.5));

    let second = &tasks[1];
    assert_eq!(second.title, "Assign adjuster");
    assert_eq!(second.depends_on, vec!["req-1"]);
    assert_eq!(second.stakeholders, vec!["person-ana"]);
    assert_eq!(second.unit_category, Some(Lenient::Known(UnitCategory::Other)));
}

#[test]
fn test_legacy_migration_warnings() {
    let imported = import_container(&container(legacy_crate()), &HashMap::new()).unwrap();
    let kinds: Vec<MigrationKind> = imported.warnings.iter().map(|w| w.kind).collect();
    assert_eq!(
        kinds,
        vec![
            MigrationKind::TitlePromoted,
            MigrationKind::UnitCategoryRemapped,
            MigrationKind::UnitCategoryUnmapped,
            MigrationKind::ValueDriverCleared,
        ]
    );
    let messages: Vec<&str> = imported.warnings.iter().map(|w| w.message.as_str()).collect();
    assert_eq!(messages[0], "1 requirement(s) had description used as title.");
    assert_eq!(messages[2], "Unmapped unit categories dropped (set to 'other'): widget.");
    assert_eq!(
        messages[3],
        "Project primaryValueDriver 'speed' is not in current schema; field cleared."
    );
    assert_eq!(imported.schema_version, None);
}

#[test]
fn test_legacy_stage() {
    let doc = decode(&container(legacy_crate())).unwrap();
    let stages = doc.governance.unwrap().stages;
    assert_eq!(stages.len(), 1);
    let stage = &stages[0];
    assert_eq!(stage.id, "stage-1");
    assert_eq!(stage.start_date.as_deref(), Some("2024-01-01"));
    assert_eq!(stage.end_date.as_deref(), Some("2024-03-31"));
    assert_eq!(stage.compliance_standards, vec!["ISO 27001"]);

    assert_eq!(stage.agents.len(), 2);
    assert_eq!(stage.agents[0].kind, AgentKind::Person);
    assert_eq!(
        stage.agents[0].person_id.as_deref(),
        Some("https://orcid.org/0000-0003-1415-9269")
    );
    assert_eq!(stage.agents[0].role.as_deref(), Some("Reviewer"));
    assert_eq!(stage.agents[1].kind, AgentKind::Organization);
    assert_eq!(stage.agents[1].name.as_deref(), Some("Internal Audit"));

    assert_eq!(stage.milestones.len(), 1);
    assert_eq!(stage.milestones[0].description, "Pilot sign-off");
    assert_eq!(stage.milestones[0].kpi.as_deref(), Some("90% routed correctly"));
}

#[test]
fn test_legacy_dataset_and_outcomes() {
    let doc = decode(&container(legacy_crate())).unwrap();

    let datasets = doc.data_access.unwrap().datasets;
    assert_eq!(datasets.len(), 1);
    let ds = &datasets[0];
    assert_eq!(ds.format.as_deref(), Some("text/csv"));
    assert_eq!(ds.access_rights, Some(AccessRights::Restricted));
    assert_eq!(ds.duo_terms, vec!["DUO:0000042", "DUO:0000006"]);
    assert_eq!(ds.contains_personal_data, Some(true));

    let outcomes = doc.outcomes.unwrap();
    assert!(outcomes.deliverables.is_empty(), "milestone read as deliverable");
    assert_eq!(outcomes.publications.len(), 1);
    assert_eq!(outcomes.publications[0].doi.as_deref(), Some("10.1000/xyz"));
    assert_eq!(outcomes.publications[0].authors, vec!["Grace Hopper", "Alan Turing"]);
}

#[test]
fn test_container_key_aliases() {
    let doc = decode(&container(json!({
        "context": {"aac": "https://w3id.org/agentic-automation-canvas/vocab#"},
        "nodes": [{"@id": "#project", "@type": "schema:Project", "name": "Aliased"}]
    })))
    .unwrap();
    assert_eq!(doc.project.title, "Aliased");
}

#[test]
fn test_structural_errors() {
    let missing_graph = GraphContainer::from_value(&json!({"@context": "x"})).unwrap_err();
    assert!(matches!(missing_graph, DecodeError::MissingGraph));
    assert!(missing_graph.is_structural());

    let missing_context = GraphContainer::from_value(&json!({"@graph": []})).unwrap_err();
    assert!(matches!(missing_context, DecodeError::MissingContext));

    let not_array = GraphContainer::from_value(&json!({"@context": "x", "@graph": {}})).unwrap_err();
    assert!(matches!(not_array, DecodeError::MalformedGraph(_)));

    let bad_json = import_json("{not json").unwrap_err();
    assert!(matches!(bad_json, DecodeError::Json(_)));
    assert!(!bad_json.is_structural());
}

#[test]
fn test_first_exporter_project() {
    let imported = import_container(&container(first_exporter_crate()), &HashMap::new()).unwrap();
    let project = &imported.document.project;
    assert_eq!(project.title, "Invoice Automation");
    assert_eq!(project.description, "Automate invoice keying");
    assert_eq!(project.objective.as_deref(), Some("Cut manual keying by half"));
    assert_eq!(project.start_date.as_deref(), Some("2025-01-01"));
    assert_eq!(project.end_date.as_deref(), Some("2025-12-31"));
    assert_eq!(project.keywords, vec!["finance", "ocr"]);
    assert_eq!(project.identifier.as_deref(), Some("PRJ-7"));
    assert_eq!(imported.document.version, None);
    assert_eq!(imported.schema_version, None);
}

#[test]
fn test_first_exporter_steps_keep_user_story() {
    let imported = import_container(&container(first_exporter_crate()), &HashMap::new()).unwrap();
    let doc = &imported.document;
    assert!(doc.stakeholders().is_empty());

    let tasks = doc.tasks();
    assert_eq!(tasks.len(), 2);

    assert_eq!(tasks[0].id, "requirement-0");
    assert_eq!(tasks[0].title, "Read PDFs");
    assert_eq!(tasks[0].description, None);
    assert_eq!(tasks[0].user_story.as_deref(), Some("As a clerk I want fields extracted"));
    assert_eq!(tasks[0].priority, Some(Priority::High));
    assert_eq!(tasks[0].status, Some(TaskStatus::InProgress));
    assert!(tasks[0].benefits.is_empty());

    assert_eq!(tasks[1].id, "requirement-1");
    assert_eq!(tasks[1].title, "Post to ledger");
    assert_eq!(tasks[1].user_story, None);
    assert_eq!(tasks[1].priority, Some(Priority::Low));
    assert_eq!(tasks[1].status, None);

    let kinds: Vec<MigrationKind> = imported.warnings.iter().map(|w| w.kind).collect();
    assert_eq!(kinds, vec![MigrationKind::TitlePromoted]);
    assert_eq!(
        imported.warnings[0].message,
        "2 requirement(s) had description used as title."
    );
}

#[test]
fn test_first_exporter_stage_agents() {
    let doc = decode(&container(first_exporter_crate())).unwrap();
    assert_eq!(
        doc.persons,
        vec![Person {
            id: "agent-0-0".into(),
            name: "Dana Ruiz".into(),
            ..Default::default()
        }]
    );

    let stages = doc.governance.unwrap().stages;
    assert_eq!(stages.len(), 2);

    let pilot = &stages[0];
    assert_eq!(pilot.id, "stage-0");
    assert_eq!(pilot.name, "Pilot");
    assert_eq!(pilot.start_date.as_deref(), Some("2025-01-06"));
    assert_eq!(pilot.end_date.as_deref(), Some("2025-02-28"));
    assert!(pilot.milestones.is_empty());
    assert!(pilot.compliance_standards.is_empty());
    assert_eq!(
        pilot.agents,
        vec![
            Agent {
                person_id: Some("agent-0-0".into()),
                role: Some("Reviewer".into()),
                kind: AgentKind::Person,
                ..Default::default()
            },
            Agent {
                name: Some("Audit Office".into()),
                role: Some("Oversight".into()),
                kind: AgentKind::Organization,
                ..Default::default()
            },
        ]
    );

    let rollout = &stages[1];
    assert_eq!(rollout.id, "stage-1");
    assert_eq!(rollout.start_date, None);
    assert_eq!(
        rollout.agents,
        vec![Agent {
            name: Some("OCR Engine".into()),
            kind: AgentKind::Software,
            ..Default::default()
        }]
    );
}

#[test]
fn test_first_exporter_dataset_and_outcomes() {
    let doc = decode(&container(first_exporter_crate())).unwrap();

    assert_eq!(
        doc.data_access.unwrap().datasets,
        vec![Dataset {
            id: "dataset-0".into(),
            title: "Invoices 2024".into(),
            description: Some("Scanned supplier invoices".into()),
            format: Some("application/pdf".into()),
            license: Some("https://creativecommons.org/licenses/by/4.0/".into()),
            access_rights: Some(AccessRights::Restricted),
            duo_terms: vec!["DUO:0000007".into()],
            identifier: Some("doi:10.5555/inv".into()),
            ..Default::default()
        }]
    );

    let outcomes = doc.outcomes.unwrap();
    assert_eq!(
        outcomes.deliverables,
        vec![Deliverable {
            id: "outcome-0".into(),
            title: "Extraction service".into(),
            kind: String::new(),
            description: Some("Deployed extractor".into()),
            date: Some("2025-03-01".into()),
            identifier: Some("https://example.org/svc".into()),
        }],
        "untitled deliverable is skipped"
    );
    assert_eq!(
        outcomes.publications,
        vec![Publication {
            id: "publication-0".into(),
            title: "Keying less".into(),
            doi: Some("10.1234/kl".into()),
            authors: vec!["Dana Ruiz".into(), "Lee Wong".into()],
            date: Some("2025-04-01".into()),
        }]
    );
    assert!(outcomes.evaluations.is_empty());
}
