//! Translate a drawn graph into the executor's block list.

use std::collections::HashMap;

use datagent_config::{BlockKind, CompiledBlock, Destination, NodeConfig};
use tracing::{debug, warn};

use crate::node::{Node, NodeId};
use crate::store::GraphStore;
use crate::topo::kahn;

/// Source used for input blocks that were never configured.
pub const DEFAULT_SOURCE: &str = "data.csv";
/// Prompt used for process blocks without a user instruction.
pub const DEFAULT_PROCESS_PROMPT: &str = "Process the data";
/// Prompt used for visualize blocks without a user instruction.
pub const DEFAULT_VISUALIZE_PROMPT: &str = "Create a visualization of the data";
/// Script used for output blocks without a destination.
pub const DEFAULT_INIT_SCRIPT: &str = "# no-op";

/// Result of compiling a graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Compilation {
  /// Every node exactly once, upstream before downstream where possible.
  pub order: Vec<NodeId>,
  /// Nodes that sit on or behind a cycle. They are appended to `order` in
  /// their original sequence order instead of failing the compilation.
  pub cyclic: Vec<NodeId>,
  /// One block per node, listed in `order`.
  pub blocks: Vec<CompiledBlock>,
}

/// Compute an execution order for the store's nodes.
///
/// Kahn's algorithm seeded with zero in-degree nodes in insertion order, with
/// successors visited in edge-insertion order. Returns `(order, cyclic)`; see
/// [`Compilation`].
pub fn execution_order(store: &GraphStore) -> (Vec<NodeId>, Vec<NodeId>) {
  let nodes = store.nodes();
  let index: HashMap<NodeId, usize> = nodes.iter().enumerate().map(|(i, n)| (n.id, i)).collect();

  let arcs = store
    .edges()
    .iter()
    .filter_map(|e| Some((*index.get(&e.source)?, *index.get(&e.target)?)));
  let outcome = kahn(nodes.len(), arcs);

  let mut order: Vec<NodeId> = outcome.sorted.iter().map(|&i| nodes[i].id).collect();
  let cyclic: Vec<NodeId> = outcome.remaining.iter().map(|&i| nodes[i].id).collect();
  if !cyclic.is_empty() {
    let names: Vec<String> = cyclic.iter().map(ToString::to_string).collect();
    warn!(
      nodes = ?names,
      "graph contains a cycle, appending remaining nodes in sequence order"
    );
    order.extend(cyclic.iter().copied());
  }

  (order, cyclic)
}

/// Order the graph and serialize each node into a [`CompiledBlock`].
///
/// Compilation never fails: unset configuration falls back to placeholders
/// and cycles fall back to sequence order.
pub fn compile(store: &GraphStore) -> Compilation {
  let (order, cyclic) = execution_order(store);

  let blocks: Vec<CompiledBlock> = order
    .iter()
    .filter_map(|&id| store.node(id))
    .map(|node| compile_node(node, store.predecessors(node.id)))
    .collect();

  debug!(blocks = blocks.len(), cyclic = cyclic.len(), "graph compiled");

  Compilation {
    order,
    cyclic,
    blocks,
  }
}

fn compile_node(node: &Node, predecessors: Vec<NodeId>) -> CompiledBlock {
  let kind = match &node.config {
    NodeConfig::Input { source, .. } => BlockKind::InputSource {
      csv_source: non_blank(source.as_deref())
        .unwrap_or(DEFAULT_SOURCE)
        .to_string(),
    },
    NodeConfig::Process { .. } => BlockKind::Process {
      prompt: node
        .config
        .latest_instruction()
        .unwrap_or(DEFAULT_PROCESS_PROMPT)
        .to_string(),
    },
    // The executor has no visualization stage; it runs as a process step.
    NodeConfig::Visualize { .. } => BlockKind::Process {
      prompt: node
        .config
        .latest_instruction()
        .unwrap_or(DEFAULT_VISUALIZE_PROMPT)
        .to_string(),
    },
    NodeConfig::Output { destination, .. } => match destination {
      Some(Destination::Email { address }) if non_blank(Some(address.as_str())).is_some() => {
        BlockKind::Destination {
          email_dest: address.trim().to_string(),
        }
      }
      Some(Destination::Script { init_script }) if non_blank(Some(init_script.as_str())).is_some() => {
        BlockKind::Output {
          init_script: init_script.clone(),
        }
      }
      _ => BlockKind::Output {
        init_script: DEFAULT_INIT_SCRIPT.to_string(),
      },
    },
  };

  CompiledBlock {
    block_id: node.id.get(),
    kind,
    pre_req: predecessors.into_iter().map(NodeId::get).collect(),
  }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
  value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
  use super::*;
  use datagent_config::{BlockType, Message, NodePatch, Position};
  use rand::rngs::StdRng;
  use rand::{Rng, SeedableRng};

  fn add(store: &mut GraphStore, block_type: BlockType) -> NodeId {
    store.add_node(block_type, Position::default()).id
  }

  fn connect(store: &mut GraphStore, source: NodeId, target: NodeId) {
    store.add_edge(source, target, None, None).unwrap();
  }

  #[test]
  fn test_empty_graph() {
    let compilation = compile(&GraphStore::new());
    assert!(compilation.order.is_empty());
    assert!(compilation.blocks.is_empty());
    assert!(compilation.cyclic.is_empty());
  }

  #[test]
  fn test_single_edge_input_to_output() {
    let mut store = GraphStore::new();
    let input = add(&mut store, BlockType::Input);
    let output = add(&mut store, BlockType::Output);
    connect(&mut store, input, output);

    let compilation = compile(&store);
    assert_eq!(compilation.blocks.len(), 2);
    assert_eq!(compilation.blocks[0].block_id, input.get());
    assert_eq!(compilation.blocks[1].block_id, output.get());
    assert_eq!(compilation.blocks[1].pre_req, vec![input.get()]);
    assert!(compilation.blocks[0].pre_req.is_empty());
  }

  #[test]
  fn test_placeholders_for_unconfigured_nodes() {
    let mut store = GraphStore::new();
    add(&mut store, BlockType::Input);
    add(&mut store, BlockType::Process);
    add(&mut store, BlockType::Visualize);
    add(&mut store, BlockType::Output);

    let kinds: Vec<BlockKind> = compile(&store).blocks.into_iter().map(|b| b.kind).collect();
    assert_eq!(
      kinds,
      vec![
        BlockKind::InputSource {
          csv_source: DEFAULT_SOURCE.to_string()
        },
        BlockKind::Process {
          prompt: DEFAULT_PROCESS_PROMPT.to_string()
        },
        BlockKind::Process {
          prompt: DEFAULT_VISUALIZE_PROMPT.to_string()
        },
        BlockKind::Output {
          init_script: DEFAULT_INIT_SCRIPT.to_string()
        },
      ]
    );
  }

  #[test]
  fn test_configured_nodes_serialize_their_payload() {
    let mut store = GraphStore::new();
    let input = add(&mut store, BlockType::Input);
    let process = add(&mut store, BlockType::Process);
    let output = add(&mut store, BlockType::Output);
    connect(&mut store, input, process);
    connect(&mut store, process, output);

    store.update_node_data(
      input,
      &NodePatch {
        source: Some("imdb_top_1000.csv".to_string()),
        ..Default::default()
      },
    );
    store.push_message(process, Message::user("drop rows with missing gross"));
    store.push_message(process, Message::assistant("Removed 169 rows"));
    store.push_message(process, Message::user("top rated movies by genre"));
    store.update_node_data(
      output,
      &NodePatch {
        destination: Some(Destination::Email {
          address: " analyst@company.com ".to_string(),
        }),
        ..Default::default()
      },
    );

    let blocks = compile(&store).blocks;
    assert_eq!(
      serde_json::to_value(&blocks).unwrap(),
      serde_json::json!([
        { "block_id": 1, "block_type": "input_source", "csv_source": "imdb_top_1000.csv" },
        { "block_id": 2, "block_type": "process", "prompt": "top rated movies by genre", "pre_req": [1] },
        { "block_id": 3, "block_type": "destination", "email_dest": "analyst@company.com", "pre_req": [2] }
      ])
    );
  }

  #[test]
  fn test_output_script_destination() {
    let mut store = GraphStore::new();
    let output = add(&mut store, BlockType::Output);
    store.update_node_data(
      output,
      &NodePatch {
        destination: Some(Destination::Script {
          init_script: "df.to_csv('out.csv')".to_string(),
        }),
        ..Default::default()
      },
    );

    assert_eq!(
      compile(&store).blocks[0].kind,
      BlockKind::Output {
        init_script: "df.to_csv('out.csv')".to_string()
      }
    );
  }

  #[test]
  fn test_ties_broken_by_insertion_order() {
    let mut store = GraphStore::new();
    let output = add(&mut store, BlockType::Output);
    let second = add(&mut store, BlockType::Input);
    let first = add(&mut store, BlockType::Input);
    connect(&mut store, first, output);
    connect(&mut store, second, output);

    let compilation = compile(&store);
    assert_eq!(compilation.order, vec![second, first, output]);
    // pre_req follows edge insertion order
    assert_eq!(
      compilation.blocks[2].pre_req,
      vec![first.get(), second.get()]
    );
  }

  #[test]
  fn test_cycle_falls_back_to_sequence_order() {
    let mut store = GraphStore::new();
    let input = add(&mut store, BlockType::Input);
    let a = add(&mut store, BlockType::Process);
    let b = add(&mut store, BlockType::Process);
    let output = add(&mut store, BlockType::Output);
    connect(&mut store, input, a);
    connect(&mut store, a, b);
    connect(&mut store, b, a);
    connect(&mut store, b, output);

    let compilation = compile(&store);
    assert_eq!(compilation.cyclic, vec![a, b, output]);
    assert_eq!(compilation.order, vec![input, a, b, output]);
    assert_eq!(compilation.blocks.len(), 4);
  }

  #[test]
  fn test_compiling_twice_is_stable() {
    let mut store = GraphStore::new();
    let i1 = add(&mut store, BlockType::Input);
    let i2 = add(&mut store, BlockType::Input);
    let p = add(&mut store, BlockType::Process);
    let v = add(&mut store, BlockType::Visualize);
    let o = add(&mut store, BlockType::Output);
    connect(&mut store, i2, p);
    connect(&mut store, i1, p);
    connect(&mut store, p, v);
    connect(&mut store, v, o);
    connect(&mut store, i1, o);

    assert_eq!(compile(&store), compile(&store));
  }

  /// Build a random graph that respects the adjacency rule and contains no
  /// process -> process back edges.
  fn random_dag(rng: &mut StdRng) -> GraphStore {
    let mut store = GraphStore::new();
    let count = rng.random_range(0..12);
    let mut ids = Vec::new();
    for _ in 0..count {
      let block_type = BlockType::ALL[rng.random_range(0..4)];
      ids.push(add(&mut store, block_type));
    }
    for (i, &source) in ids.iter().enumerate() {
      for &target in &ids[i + 1..] {
        if rng.random_bool(0.35) {
          // Disallowed pairs are rejected by the store; that is fine here.
          let _ = store.add_edge(source, target, None, None);
        }
      }
    }
    store
  }

  #[test]
  fn test_random_dags_produce_valid_topological_orders() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..200 {
      let store = random_dag(&mut rng);
      let compilation = compile(&store);

      assert!(compilation.cyclic.is_empty());
      assert_eq!(compilation.order.len(), store.nodes().len());

      let position: HashMap<NodeId, usize> = compilation
        .order
        .iter()
        .enumerate()
        .map(|(i, &id)| (id, i))
        .collect();
      assert_eq!(position.len(), store.nodes().len(), "order has duplicates");

      for edge in store.edges() {
        assert!(position[&edge.source] < position[&edge.target]);
      }

      for node in store.nodes() {
        if node.block_type() == BlockType::Input {
          let occurrences = compilation.order.iter().filter(|&&id| id == node.id).count();
          assert_eq!(occurrences, 1);
        }
      }
    }
  }
}
