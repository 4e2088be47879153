//! Project export format.
//!
//! ```json
//! {
//!   "project": {
//!     "id": "…", "name": "Quotes", "description": "",
//!     "blocks": [ { "id": "node-1", "type": "input", "title": "Input", "source": "q.csv" } ],
//!     "edges": [ { "source": "node-1", "target": "node-2" } ]
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::node::{NodeConfig, Position};

/// Top-level wrapper written to and read from export files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectExport {
  pub project: ExportedProject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedProject {
  pub id: String,
  pub name: String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub blocks: Vec<SerializedNode>,
  #[serde(default)]
  pub edges: Vec<SerializedEdge>,
}

/// A node as written to an export file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedNode {
  pub id: String,
  pub title: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub position: Option<Position>,
  #[serde(flatten)]
  pub config: NodeConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedEdge {
  pub source: String,
  pub target: String,
  #[serde(
    default,
    rename = "sourceHandle",
    alias = "source_handle",
    skip_serializing_if = "Option::is_none"
  )]
  pub source_handle: Option<String>,
  #[serde(
    default,
    rename = "targetHandle",
    alias = "target_handle",
    skip_serializing_if = "Option::is_none"
  )]
  pub target_handle: Option<String>,
}
