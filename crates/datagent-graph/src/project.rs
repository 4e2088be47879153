use std::collections::{HashMap, HashSet};

use datagent_config::{
  ExportedProject, NodeConfig, ProjectExport, SerializedEdge, SerializedNode,
};
use tracing::info;

use crate::error::{GraphError, ImportError};
use crate::node::{Node, NodeId, NodeStatus};
use crate::store::GraphStore;

/// A named pipeline held in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
  pub id: String,
  pub name: String,
  pub description: String,
  pub graph: GraphStore,
}

impl Project {
  /// Create an empty project with a fresh id.
  pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
    Self {
      id: uuid::Uuid::new_v4().to_string(),
      name: name.into(),
      description: description.into(),
      graph: GraphStore::new(),
    }
  }

  /// Serialize into the export format.
  pub fn export(&self) -> ProjectExport {
    let blocks = self
      .graph
      .nodes()
      .iter()
      .map(|node| SerializedNode {
        id: node.id.to_string(),
        title: node.title.clone(),
        position: Some(node.position),
        config: node.config.clone(),
      })
      .collect();

    let edges = self
      .graph
      .edges()
      .iter()
      .map(|edge| SerializedEdge {
        source: edge.source.to_string(),
        target: edge.target.to_string(),
        source_handle: edge.source_handle.clone(),
        target_handle: edge.target_handle.clone(),
      })
      .collect();

    ProjectExport {
      project: ExportedProject {
        id: self.id.clone(),
        name: self.name.clone(),
        description: self.description.clone(),
        blocks,
        edges,
      },
    }
  }

  pub fn to_json(&self) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&self.export())
  }

  pub fn from_json(json: &str) -> Result<Self, ImportError> {
    let export: ProjectExport = serde_json::from_str(json)?;
    Self::from_export(export)
  }

  /// Rebuild a project from the export format.
  ///
  /// Ids of the form `node-<n>` keep their number; any other id gets a fresh
  /// number above every kept one. Numbers above [`NodeId::MAX_IMPORTED`] are
  /// rejected so the store's counter can never overflow. Edges are replayed through
  /// [`GraphStore::add_edge`], so the imported graph obeys the same rules as
  /// one drawn by hand.
  pub fn from_export(export: ProjectExport) -> Result<Self, ImportError> {
    let ExportedProject {
      id,
      name,
      description,
      blocks,
      edges,
    } = export.project;

    let mut seen = HashSet::new();
    for block in &blocks {
      if !seen.insert(block.id.as_str()) {
        return Err(ImportError::DuplicateNodeId(block.id.clone()));
      }
    }

    let mut claimed = HashSet::new();
    let parsed: Vec<Option<NodeId>> = blocks
      .iter()
      .map(|b| NodeId::parse(&b.id).filter(|id| claimed.insert(*id)))
      .collect();
    if let Some(&id) = parsed.iter().flatten().find(|id| id.get() > NodeId::MAX_IMPORTED) {
      return Err(GraphError::NodeIdOutOfRange(id).into());
    }
    let mut last = claimed.iter().map(|id| id.get()).max().unwrap_or(0);

    let mut graph = GraphStore::new();
    let mut ids: HashMap<String, NodeId> = HashMap::with_capacity(blocks.len());
    let mut renumbered = 0usize;

    for (block, parsed_id) in blocks.into_iter().zip(parsed) {
      let node_id = match parsed_id {
        Some(node_id) => node_id,
        None => {
          last = last
            .checked_add(1)
            .ok_or(GraphError::NodeIdOutOfRange(NodeId::new(last)))?;
          renumbered += 1;
          NodeId::new(last)
        }
      };
      ids.insert(block.id, node_id);

      let status = if block.config == NodeConfig::empty(block.config.block_type()) {
        NodeStatus::Empty
      } else {
        NodeStatus::Configured
      };
      graph
        .insert_node(Node {
          id: node_id,
          title: block.title,
          position: block.position.unwrap_or_default(),
          status,
          config: block.config,
        })?;
    }

    for edge in edges {
      let source = *ids
        .get(&edge.source)
        .ok_or_else(|| ImportError::UnknownNode(edge.source.clone()))?;
      let target = *ids
        .get(&edge.target)
        .ok_or_else(|| ImportError::UnknownNode(edge.target.clone()))?;
      graph
        .add_edge(source, target, edge.source_handle, edge.target_handle)
        .map_err(|error| ImportError::InvalidEdge {
          source_id: edge.source.clone(),
          target_id: edge.target.clone(),
          error,
        })?;
    }

    info!(
      project_id = %id,
      nodes = graph.nodes().len(),
      edges = graph.edges().len(),
      renumbered,
      "project imported"
    );

    Ok(Self {
      id,
      name,
      description,
      graph,
    })
  }
}
