//! Linked-data graph container, nodes and the fixed vocabulary.

pub mod node;
pub mod vocab;

pub use node::{reference, GraphContainer, Node};
pub use vocab::{context_value, ids, keys, EntityKind};
