//! Canonical document model.

pub mod benefit;
pub mod dataset;
pub mod display;
pub mod finding;
pub mod governance;
pub mod lenient;
pub mod outcome;
pub mod project;
pub mod task;

pub use benefit::{
    AggregationBasis, Benefit, BenefitKind, BenefitValue, Direction, Level, ValueDriver,
    ValueMeaning,
};
pub use dataset::{AccessRights, DataAccess, Dataset};
pub use display::{BenefitRef, DisplayGroup, DisplayState};
pub use finding::{
    FindingKind, MigrationKind, MigrationWarning, Severity, ValidationFinding, ValidationReport,
};
pub use governance::{Agent, AgentKind, Governance, GovernanceStage, Milestone};
pub use lenient::Lenient;
pub use outcome::{Deliverable, Evaluation, Outcomes, Publication};
pub use project::{
    CanvasDocument, DeveloperFeasibility, Person, Project, Stakeholder, TrlLevel,
    UserExpectations,
};
pub use task::{Priority, RiskLevel, Task, TaskFeasibility, TaskStatus, TimeUnit, UnitCategory};
