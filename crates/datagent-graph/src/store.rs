//! In-memory graph of one project.

use datagent_config::{BlockType, Message, NodeConfig, NodePatch, Position};
use tracing::{debug, warn};

use crate::edge::{Edge, EdgeId};
use crate::error::GraphError;
use crate::node::{Node, NodeId, NodeStatus};
use crate::rules::is_connection_allowed;

/// Authoritative store of a project's nodes and edges.
///
/// Nodes and edges are kept in insertion order; the compiler relies on that
/// order to break ties. Ids are handed out from per-store counters and are
/// never reused, even after removal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphStore {
  nodes: Vec<Node>,
  edges: Vec<Edge>,
  last_node_id: u64,
  last_edge_id: u64,
}

impl GraphStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Create a node of the given type with a fresh id and default title.
  pub fn add_node(&mut self, block_type: BlockType, position: Position) -> &Node {
    self.last_node_id += 1;
    let node = Node {
      id: NodeId::new(self.last_node_id),
      title: block_type.default_title().to_string(),
      position,
      status: NodeStatus::Empty,
      config: NodeConfig::empty(block_type),
    };
    debug!(node_id = %node.id, block_type = %block_type, "node added");
    self.push_node(node)
  }

  /// Insert a node that already carries an id, e.g. when importing a project.
  ///
  /// The id counter is advanced past `node.id` so later nodes never collide.
  pub(crate) fn insert_node(&mut self, node: Node) -> Result<&Node, GraphError> {
    if self.node(node.id).is_some() {
      return Err(GraphError::NodeExists(node.id));
    }
    self.last_node_id = self.last_node_id.max(node.id.get());
    Ok(self.push_node(node))
  }

  fn push_node(&mut self, node: Node) -> &Node {
    self.nodes.push(node);
    &self.nodes[self.nodes.len() - 1]
  }

  /// Remove a node together with every edge that starts or ends at it.
  pub fn remove_node(&mut self, id: NodeId) -> Option<Node> {
    let index = self.nodes.iter().position(|n| n.id == id)?;
    let node = self.nodes.remove(index);
    let before = self.edges.len();
    self.edges.retain(|e| !e.touches(id));
    debug!(
      node_id = %id,
      edges_removed = before - self.edges.len(),
      "node removed"
    );
    Some(node)
  }

  /// Merge a partial update into a node.
  ///
  /// Unknown ids are ignored: the canvas only ever updates nodes it is
  /// displaying. Returns whether a node was found.
  pub fn update_node_data(&mut self, id: NodeId, patch: &NodePatch) -> bool {
    let Some(node) = self.node_mut(id) else {
      debug!(node_id = %id, "update for unknown node ignored");
      return false;
    };

    let mut changed = node.config.merge(patch);
    if let Some(title) = &patch.title {
      node.title = title.clone();
      changed = true;
    }
    if changed {
      node.status = NodeStatus::Configured;
    }
    true
  }

  /// Append a message to a process or visualize node's conversation.
  ///
  /// Same tolerance as [`update_node_data`](Self::update_node_data); nodes
  /// without a conversation are left untouched.
  pub fn push_message(&mut self, id: NodeId, message: Message) -> bool {
    let Some(node) = self.node_mut(id) else {
      return false;
    };
    match &mut node.config {
      NodeConfig::Process { conversation, .. } | NodeConfig::Visualize { conversation, .. } => {
        conversation.push(message);
        node.status = NodeStatus::Configured;
        true
      }
      _ => false,
    }
  }

  /// Connect two nodes.
  ///
  /// Rejected when an endpoint is missing, when the block types may not be
  /// connected, when a named handle is already in use, or when the exact same
  /// connection already exists.
  pub fn add_edge(
    &mut self,
    source: NodeId,
    target: NodeId,
    source_handle: Option<String>,
    target_handle: Option<String>,
  ) -> Result<&Edge, GraphError> {
    let result = self.check_edge(
      source,
      target,
      source_handle.as_deref(),
      target_handle.as_deref(),
    );
    if let Err(e) = result {
      warn!(source = %source, target = %target, error = %e, "edge rejected");
      return Err(e);
    }

    self.last_edge_id += 1;
    let edge = Edge {
      id: EdgeId::new(self.last_edge_id),
      source,
      target,
      source_handle,
      target_handle,
    };
    debug!(edge_id = %edge.id, source = %source, target = %target, "edge added");
    self.edges.push(edge);
    Ok(&self.edges[self.edges.len() - 1])
  }

  fn check_edge(
    &self,
    source: NodeId,
    target: NodeId,
    source_handle: Option<&str>,
    target_handle: Option<&str>,
  ) -> Result<(), GraphError> {
    let source_type = self
      .node(source)
      .ok_or(GraphError::NodeNotFound(source))?
      .block_type();
    let target_type = self
      .node(target)
      .ok_or(GraphError::NodeNotFound(target))?
      .block_type();

    if !is_connection_allowed(source_type, target_type) {
      return Err(GraphError::ConnectionNotAllowed {
        source_type,
        target_type,
      });
    }

    for edge in &self.edges {
      if let Some(handle) = source_handle {
        if edge.source == source && edge.source_handle.as_deref() == Some(handle) {
          return Err(GraphError::HandleOccupied {
            node_id: source,
            handle: handle.to_string(),
          });
        }
      }
      if let Some(handle) = target_handle {
        if edge.target == target && edge.target_handle.as_deref() == Some(handle) {
          return Err(GraphError::HandleOccupied {
            node_id: target,
            handle: handle.to_string(),
          });
        }
      }
      if edge.source == source
        && edge.target == target
        && edge.source_handle.as_deref() == source_handle
        && edge.target_handle.as_deref() == target_handle
      {
        return Err(GraphError::DuplicateEdge {
          source_id: source,
          target_id: target,
        });
      }
    }

    Ok(())
  }

  pub fn remove_edge(&mut self, id: EdgeId) -> Option<Edge> {
    let index = self.edges.iter().position(|e| e.id == id)?;
    debug!(edge_id = %id, "edge removed");
    Some(self.edges.remove(index))
  }

  /// Remove every node and edge. Id counters keep running.
  pub fn clear(&mut self) {
    self.nodes.clear();
    self.edges.clear();
  }

  pub fn node(&self, id: NodeId) -> Option<&Node> {
    self.nodes.iter().find(|n| n.id == id)
  }

  fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
    self.nodes.iter_mut().find(|n| n.id == id)
  }

  pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
    self.edges.iter().find(|e| e.id == id)
  }

  /// Nodes in insertion order.
  pub fn nodes(&self) -> &[Node] {
    &self.nodes
  }

  /// Edges in insertion order.
  pub fn edges(&self) -> &[Edge] {
    &self.edges
  }

  /// Distinct upstream nodes of `id`, in edge-insertion order.
  pub fn predecessors(&self, id: NodeId) -> Vec<NodeId> {
    let mut upstream = Vec::new();
    for edge in self.edges.iter().filter(|e| e.target == id) {
      if !upstream.contains(&edge.source) {
        upstream.push(edge.source);
      }
    }
    upstream
  }

  /// Distinct downstream nodes of `id`, in edge-insertion order.
  pub fn successors(&self, id: NodeId) -> Vec<NodeId> {
    let mut downstream = Vec::new();
    for edge in self.edges.iter().filter(|e| e.source == id) {
      if !downstream.contains(&edge.target) {
        downstream.push(edge.target);
      }
    }
    downstream
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }
}
