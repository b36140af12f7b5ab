//! # canvas-crate
//!
//! Bidirectional codec between agentic automation canvas documents and
//! RO-Crate JSON-LD graphs.
//!
//! A canvas document is a nested record describing a project, its tasks and
//! their quantified benefits, governance stages, datasets and outcomes. This
//! crate turns it into a flat graph of typed nodes linked by `@id` references
//! and back again.
//!
//! ## Core Contract
//!
//! 1. Every person appears as exactly one node, however many places reference them
//! 2. Roles are separate records that point at the person node
//! 3. `decode(encode(d))` equals the normalized `d` for everything a task carries
//! 4. Older graph shapes and document revisions are read, never rejected
//!
//! ## Architecture
//!
//! ```text
//! export: CanvasDocument → validate → GraphEncoder → GraphContainer
//!                                          ↓
//!                                  IdentityRegistry
//!
//! import: GraphContainer → GraphDecoder → normalize → CanvasDocument
//! ```
//!
//! ## Determinism
//!
//! - Same document + same options → identical graph and fingerprint
//! - Each encode builds its own registry and id counters; nothing is shared
//!   across calls

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod canonical;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod graph;
pub mod identity;
pub mod normalize;
pub mod pipeline;
pub mod types;
pub mod validate;

/// Current canonical-document schema tag.
pub const CANVAS_SCHEMA_VERSION: &str = "0.10.0";

/// RO-Crate profile the metadata descriptor conforms to.
pub const RO_CRATE_PROFILE: &str = "https://w3id.org/ro/crate/1.2";

/// RO-Crate JSON-LD context.
pub const RO_CRATE_CONTEXT: &str = "https://w3id.org/ro/crate/1.2/context";

/// Prefix bound to the local vocabulary.
pub const VOCAB_PREFIX: &str = "aac";

// Re-exports
pub use canonical::{canonical_hash, canonical_hash_hex, sha256_hex, to_canonical_bytes, DigestCheck};
pub use config::{CodecConfig, EncodeOptions, SidePayloadMode};
pub use decoder::{decode, decode_crate, DecodedCrate, GraphDecoder};
pub use encoder::{encode, EncodeOutput, GraphEncoder, SideFile};
pub use error::{DecodeError, ExportRefused};
pub use graph::{EntityKind, GraphContainer, Node};
pub use identity::{IdentityQuery, IdentityRegistry, RoleAssignment, RoleUsage};
pub use normalize::normalize;
pub use pipeline::{export_document, import_container, import_json, ExportOutput, ImportOutput};
pub use types::{
    Benefit, BenefitKind, BenefitValue, CanvasDocument, Direction, DisplayState, MigrationWarning,
    Person, Task, ValidationFinding, ValidationReport,
};
pub use validate::validate;
