use std::fmt;

use datagent_config::{BlockType, NodeConfig, Position};

/// Identifier of a node, assigned by the [`GraphStore`](crate::GraphStore).
///
/// The numeric value is used verbatim as the compiled `block_id`; the string
/// form `node-<n>` is what appears in export files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
  /// Largest id accepted from an export file. Ids above it would leave the
  /// store's counter no room to hand out fresh ids.
  pub const MAX_IMPORTED: u64 = u32::MAX as u64;

  pub fn new(value: u64) -> Self {
    Self(value)
  }

  pub fn get(self) -> u64 {
    self.0
  }

  /// Parse the `node-<n>` string form. Returns `None` for anything else.
  pub fn parse(s: &str) -> Option<Self> {
    let digits = s.strip_prefix("node-")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
      return None;
    }
    digits.parse().ok().map(Self)
  }
}

impl fmt::Display for NodeId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "node-{}", self.0)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStatus {
  /// Created but never configured.
  Empty,
  /// At least one configuration update has been applied.
  Configured,
}

/// A block on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
  pub id: NodeId,
  pub title: String,
  pub position: Position,
  pub status: NodeStatus,
  pub config: NodeConfig,
}

impl Node {
  pub fn block_type(&self) -> BlockType {
    self.config.block_type()
  }
}
