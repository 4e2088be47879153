use std::fmt;

use crate::node::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(u64);

impl EdgeId {
  pub fn new(value: u64) -> Self {
    Self(value)
  }

  pub fn get(self) -> u64 {
    self.0
  }
}

impl fmt::Display for EdgeId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "edge-{}", self.0)
  }
}

/// A directed connection between two nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
  pub id: EdgeId,
  pub source: NodeId,
  pub target: NodeId,
  pub source_handle: Option<String>,
  pub target_handle: Option<String>,
}

impl Edge {
  /// Whether this edge touches the given node at either end.
  pub fn touches(&self, node_id: NodeId) -> bool {
    self.source == node_id || self.target == node_id
  }
}
