//! Datagent Config
//!
//! This crate contains the serializable types shared by the Datagent crates:
//! - Block types and per-type node configuration (the payload edited in the canvas)
//! - The project export format (`{ "project": { ... } }`)
//! - The compiled block wire format submitted to the executor
//! - The execution response returned by the executor
//!
//! The graph store, compiler and dispatcher take these types and never need to
//! inspect raw JSON themselves.

mod block;
mod compiled;
mod export;
mod node;
mod response;

pub use block::BlockType;
pub use compiled::{BlockKind, CompiledBlock};
pub use export::{ExportedProject, ProjectExport, SerializedEdge, SerializedNode};
pub use node::{Destination, Message, NodeConfig, NodePatch, Position, Role};
pub use response::ExecutionResponse;
