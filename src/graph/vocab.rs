//! Fixed vocabulary: context prefixes, well-known node ids, property keys
//! and the type-tag alias sets used to recognize nodes.
//!
//! ## Type Aliases
//!
//! The graph convention has been extended several times, so every logical
//! entity kind is recognized by a *set* of acceptable tags. The first alias
//! is what the encoder writes; the rest are historical spellings the decoder
//! still accepts. Adding an alias here is the only change needed when the
//! format grows a new spelling.

use serde_json::{json, Value};

/// Prefix bindings written into the `@context` object.
pub const PREFIXES: &[(&str, &str)] = &[
    ("p-plan", "http://purl.org/net/p-plan#"),
    ("prov", "http://www.w3.org/ns/prov#"),
    ("dcat", "http://www.w3.org/ns/dcat#"),
    ("dct", "http://purl.org/dc/terms/"),
    ("frapo", "http://purl.org/cerif/frapo/"),
    ("duo", "http://purl.obolibrary.org/obo/DUO_"),
    ("schema", "http://schema.org/"),
];

/// Build the `@context` value: base context URL followed by prefix bindings.
pub fn context_value(context_url: &str, vocab_prefix: &str, vocab_namespace: &str) -> Value {
    let mut bindings = serde_json::Map::new();
    bindings.insert(vocab_prefix.to_string(), json!(vocab_namespace));
    for (prefix, iri) in PREFIXES {
        bindings.insert((*prefix).to_string(), json!(iri));
    }
    json!([context_url, Value::Object(bindings)])
}

/// Well-known node ids.
pub mod ids {
    /// Metadata descriptor.
    pub const DESCRIPTOR: &str = "ro-crate-metadata.json";
    /// Root data entity.
    pub const ROOT: &str = "./";
    /// Project node.
    pub const PROJECT: &str = "#project";
    /// Plan node holding the task steps.
    pub const PLAN: &str = "#user-plan";
    /// Display-state side file.
    pub const DISPLAY_FILE: &str = "benefit-display.json";
    /// Developer feasibility side file.
    pub const FEASIBILITY_FILE: &str = "developer-feasibility.json";
}

/// Property keys shared by the encoder and decoder.
pub mod keys {
    #![allow(missing_docs)]

    // Shared
    pub const NAME: &str = "name";
    pub const DESCRIPTION: &str = "description";
    pub const IDENTIFIER: &str = "identifier";
    pub const LICENSE: &str = "license";
    pub const LOCAL_ID: &str = "aac:localId";
    pub const HAS_PART: &str = "hasPart";
    pub const ABOUT: &str = "about";
    pub const CONFORMS_TO: &str = "conformsTo";
    pub const DATE_PUBLISHED: &str = "datePublished";
    pub const DATE_CREATED: &str = "dateCreated";

    // Root
    pub const VERSION: &str = "aac:version";
    pub const VERSION_DATE: &str = "aac:versionDate";
    pub const SCHEMA_VERSION: &str = "aac:schemaVersion";
    pub const BENEFIT_DISPLAY: &str = "aac:benefitDisplay";
    pub const DEVELOPER_FEASIBILITY: &str = "aac:developerFeasibility";
    pub const MAIN_ENTITY: &str = "mainEntity";

    // Project
    pub const OBJECTIVE: &str = "aac:objective";
    pub const PROJECT_STAGE: &str = "aac:projectStage";
    pub const START_DATE: &str = "startDate";
    pub const END_DATE: &str = "endDate";
    pub const DOMAIN: &str = "aac:domain";
    pub const KEYWORDS: &str = "keywords";
    pub const FUNDING_GRANT: &str = "aac:fundingGrant";
    pub const LEAD_ORGANIZATION: &str = "aac:leadOrganization";
    pub const HEADLINE_VALUE: &str = "aac:headlineValue";
    pub const PRIMARY_VALUE_DRIVER: &str = "aac:primaryValueDriver";
    pub const CONTRIBUTOR: &str = "contributor";
    pub const HAS_PLAN: &str = "hasPlan";

    // Plan / step
    pub const HAS_STEP: &str = "p-plan:hasStep";
    pub const IS_STEP_OF_PLAN: &str = "p-plan:isStepOfPlan";
    pub const IS_PRECEDED_BY: &str = "p-plan:isPrecededBy";
    pub const USER_STORY: &str = "aac:userStory";
    pub const TITLE: &str = "aac:title";
    pub const PRIORITY: &str = "aac:priority";
    pub const STATUS: &str = "aac:status";
    pub const UNIT_OF_WORK: &str = "aac:unitOfWork";
    pub const UNIT_CATEGORY: &str = "aac:unitCategory";
    pub const VOLUME_PER_MONTH: &str = "aac:volumePerMonth";
    pub const TIME_UNIT: &str = "aac:timeUnit";
    pub const BENEFITS: &str = "aac:benefits";
    pub const DEPENDS_ON: &str = "aac:dependsOn";
    pub const STAKEHOLDER: &str = "aac:stakeholder";
    pub const FEASIBILITY: &str = "aac:feasibility";
    pub const OVERSIGHT_PER_UNIT: &str = "aac:humanOversightMinutesPerUnit";
    pub const MODEL: &str = "aac:model";
    pub const USED: &str = "prov:used";
    pub const APPLICATION_CATEGORY: &str = "schema:applicationCategory";
    pub const URL: &str = "schema:url";

    // Stage
    pub const STARTED_AT: &str = "prov:startedAtTime";
    pub const ENDED_AT: &str = "prov:endedAtTime";
    pub const ASSOCIATED_WITH: &str = "prov:wasAssociatedWith";
    pub const INFORMED_BY: &str = "prov:wasInformedBy";
    pub const HAS_MILESTONE: &str = "aac:hasMilestone";
    pub const COMPLIANCE_STANDARD: &str = "aac:complianceStandard";
    pub const KPI: &str = "aac:kpi";

    // Dataset
    pub const ENCODING_FORMAT: &str = "encodingFormat";
    pub const ACCESS_RIGHTS: &str = "dct:accessRights";
    pub const DUO_TERMS: &str = "aac:duoTerms";
    pub const LANDING_PAGE: &str = "dcat:landingPage";
    pub const PUBLISHER: &str = "publisher";
    pub const CONTAINS_PERSONAL_DATA: &str = "aac:containsPersonalData";
    pub const SENSITIVITY_LEVEL: &str = "aac:sensitivityLevel";

    // Outcomes
    pub const ADDITIONAL_TYPE: &str = "additionalType";
    pub const AUTHOR: &str = "author";
    pub const GENERATED_BY: &str = "prov:wasGeneratedBy";
    pub const EVALUATION_TYPE: &str = "aac:evaluationType";
    pub const METRICS: &str = "aac:metrics";

    // Persons and roles
    pub const AFFILIATION: &str = "affiliation";
    pub const JOB_TITLE: &str = "jobTitle";
    pub const ROLE_NAME: &str = "roleName";
    pub const ROLE: &str = "role";
    pub const PERSON: &str = "aac:person";
    pub const USAGE_CONTEXT: &str = "aac:usageContext";
    pub const SCOPE: &str = "aac:scope";
    pub const ROLE_CONTEXT: &str = "aac:roleContext";
    pub const VALUES: &str = "aac:values";

    // Files
    pub const CONTENT_SIZE: &str = "contentSize";
    pub const SHA256: &str = "sha256";
}

/// Logical entity kinds recognized in a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Project.
    Project,
    /// Plan holding task steps.
    Plan,
    /// Task step.
    Step,
    /// Governance stage.
    Stage,
    /// Dataset.
    Dataset,
    /// Generic outcome / deliverable.
    Outcome,
    /// Publication.
    Publication,
    /// Evaluation.
    Evaluation,
    /// Person.
    Person,
    /// Organization agent.
    Organization,
    /// Software agent.
    Software,
    /// Role record.
    Role,
    /// Stage milestone.
    Milestone,
    /// Side-payload file descriptor.
    File,
}

impl EntityKind {
    /// Acceptable type tags, preferred spelling first.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Project => &["schema:Project", "Project", "schema:ResearchProject", "ResearchProject"],
            Self::Plan => &["p-plan:Plan", "Plan", "schema:Plan"],
            Self::Step => &["p-plan:Step", "Step"],
            Self::Stage => &["prov:Activity", "Activity"],
            Self::Dataset => &["schema:Dataset", "Dataset", "dcat:Dataset"],
            Self::Outcome => &["schema:CreativeWork", "CreativeWork", "schema:Report", "Report"],
            Self::Publication => &["schema:ScholarlyArticle", "ScholarlyArticle"],
            Self::Evaluation => &["aac:Evaluation", "Evaluation"],
            Self::Person => &["schema:Person", "Person", "prov:Person"],
            Self::Organization => &["schema:Organization", "Organization", "prov:Organization"],
            Self::Software => &["schema:SoftwareApplication", "SoftwareApplication", "prov:SoftwareAgent"],
            Self::Role => &["schema:Role", "Role", "aac:RoleAssignment"],
            Self::Milestone => &["aac:Milestone", "Milestone"],
            Self::File => &["File", "schema:MediaObject"],
        }
    }

    /// The tag the encoder writes.
    pub fn primary(&self) -> &'static str {
        self.aliases()[0]
    }

    /// Whether any of `tags` is an accepted alias of this kind.
    pub fn matches<S: AsRef<str>>(&self, tags: &[S]) -> bool {
        let aliases = self.aliases();
        tags.iter().any(|t| aliases.contains(&t.as_ref()))
    }
}

/// `applicationCategory` of model-card nodes.
pub const MODEL_CATEGORY: &str = "Machine Learning Model";

/// `encodingFormat` of JSON side files.
pub const JSON_MEDIA_TYPE: &str = "application/json";
