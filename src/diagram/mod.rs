//! Mermaid flowchart rendering of a directory hierarchy.
//!
//! The generator walks a root directory depth-first and emits one node per
//! sub-directory plus an edge from its parent, wrapped in a fenced
//! `graph TD` block.

mod document;
mod generator;
mod node_id;

pub use document::{DiagramDocument, DiagramLine};
pub use generator::{DiagramGenerator, DiagramOptions, EntryOrder, GenerateError};
pub use node_id::{IdScheme, NodeId};
