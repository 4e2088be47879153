use datagent_config::BlockType;
use thiserror::Error;

use crate::node::NodeId;

/// Reasons a graph mutation is rejected. A rejected mutation leaves the store unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
  #[error("node not found: {0}")]
  NodeNotFound(NodeId),

  #[error("node already exists: {0}")]
  NodeExists(NodeId),

  #[error("node id {0} is out of range")]
  NodeIdOutOfRange(NodeId),

  #[error("a {source_type} block cannot connect to a {target_type} block")]
  ConnectionNotAllowed {
    source_type: BlockType,
    target_type: BlockType,
  },

  #[error("handle '{handle}' on node {node_id} is already connected")]
  HandleOccupied { node_id: NodeId, handle: String },

  #[error("edge from {source_id} to {target_id} already exists")]
  DuplicateEdge { source_id: NodeId, target_id: NodeId },
}

/// Errors raised while rebuilding a project from an export file.
#[derive(Debug, Error)]
pub enum ImportError {
  #[error("duplicate node id: {0}")]
  DuplicateNodeId(String),

  #[error("edge references unknown node '{0}'")]
  UnknownNode(String),

  #[error("invalid edge from '{source_id}' to '{target_id}': {error}")]
  InvalidEdge {
    source_id: String,
    target_id: String,
    #[source]
    error: GraphError,
  },

  #[error(transparent)]
  Graph(#[from] GraphError),

  #[error("project already exists: {0}")]
  DuplicateProject(String),

  #[error("failed to parse project export: {0}")]
  Json(#[from] serde_json::Error),
}

/// Structural problems in a compiled block list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
  #[error("invalid blocks format: {0}")]
  InvalidFormat(String),

  #[error("duplicate block_id found: {0}")]
  DuplicateBlockId(u64),

  #[error("block {block_id} depends on unknown block {missing}")]
  UnknownPrerequisite { block_id: u64, missing: u64 },

  #[error("input_source block {0} requires a 'csv_source'")]
  MissingSource(u64),

  #[error("cyclic dependencies detected between blocks {0:?}")]
  CycleDetected(Vec<u64>),
}
