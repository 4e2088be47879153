//! Datagent Graph
//!
//! This crate holds the working representation of a pipeline drawn on the canvas
//! and turns it into something the executor can run:
//! - [`GraphStore`]: the nodes and edges of one project, mutated by user commands
//! - [`is_connection_allowed`]: the fixed adjacency rule between block types
//! - [`compile`]: topological ordering and serialization into [`CompiledBlock`]s
//! - [`ExecutionPlan`]: structural checks over a compiled block list
//! - [`Project`] / [`Workspace`]: in-memory projects and the export format
//!
//! [`CompiledBlock`]: datagent_config::CompiledBlock

mod compiler;
mod edge;
mod error;
mod node;
mod plan;
mod project;
mod rules;
mod store;
mod topo;
mod workspace;

pub use compiler::{
  Compilation, DEFAULT_INIT_SCRIPT, DEFAULT_PROCESS_PROMPT, DEFAULT_SOURCE,
  DEFAULT_VISUALIZE_PROMPT, compile, execution_order,
};
pub use edge::{Edge, EdgeId};
pub use error::{GraphError, ImportError, PlanError};
pub use node::{Node, NodeId, NodeStatus};
pub use plan::{BlockList, DestinationPlan, ExecutionPlan};
pub use project::Project;
pub use rules::is_connection_allowed;
pub use store::GraphStore;
pub use workspace::Workspace;
