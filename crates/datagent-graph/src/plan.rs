//! Structural checks over a compiled block list.
//!
//! These mirror what the executor verifies before running anything, so a
//! list can be rejected locally instead of after a round trip.

use std::collections::{HashMap, HashSet};

use datagent_config::{BlockKind, CompiledBlock};
use serde::Deserialize;

use crate::error::PlanError;
use crate::topo::kahn;

/// Accepted request shapes: a bare array or `{ "blocks": [...] }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BlockList {
  Bare(Vec<CompiledBlock>),
  Wrapped { blocks: Vec<CompiledBlock> },
}

impl BlockList {
  pub fn into_blocks(self) -> Vec<CompiledBlock> {
    match self {
      BlockList::Bare(blocks) | BlockList::Wrapped { blocks } => blocks,
    }
  }
}

/// What the executor will run for one destination block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationPlan {
  pub destination_id: u64,
  pub email_dest: String,
  /// The destination's dependency chain in execution order, ending with the
  /// destination itself.
  pub execution_order: Vec<u64>,
}

/// A block list that passed every structural check.
#[derive(Debug, Clone)]
pub struct ExecutionPlan {
  blocks: Vec<CompiledBlock>,
  index: HashMap<u64, usize>,
  order: Vec<u64>,
}

impl ExecutionPlan {
  /// Validate a block list.
  ///
  /// Rejects duplicate ids, dependencies on unknown blocks, input blocks
  /// without a source, and cycles.
  pub fn new(blocks: Vec<CompiledBlock>) -> Result<Self, PlanError> {
    let mut index = HashMap::with_capacity(blocks.len());
    for (i, block) in blocks.iter().enumerate() {
      if index.insert(block.block_id, i).is_some() {
        return Err(PlanError::DuplicateBlockId(block.block_id));
      }
      if let BlockKind::InputSource { csv_source } = &block.kind {
        if csv_source.trim().is_empty() {
          return Err(PlanError::MissingSource(block.block_id));
        }
      }
    }

    let mut arcs = Vec::new();
    for (i, block) in blocks.iter().enumerate() {
      for prereq in &block.pre_req {
        let from = index
          .get(prereq)
          .ok_or(PlanError::UnknownPrerequisite {
            block_id: block.block_id,
            missing: *prereq,
          })?;
        arcs.push((*from, i));
      }
    }

    let outcome = kahn(blocks.len(), arcs);
    if !outcome.remaining.is_empty() {
      let ids = outcome
        .remaining
        .iter()
        .map(|&i| blocks[i].block_id)
        .collect();
      return Err(PlanError::CycleDetected(ids));
    }
    let order = outcome.sorted.iter().map(|&i| blocks[i].block_id).collect();

    Ok(Self {
      blocks,
      index,
      order,
    })
  }

  /// Parse and validate a JSON request body.
  pub fn from_json(json: &str) -> Result<Self, PlanError> {
    let list: BlockList =
      serde_json::from_str(json).map_err(|e| PlanError::InvalidFormat(e.to_string()))?;
    Self::new(list.into_blocks())
  }

  pub fn blocks(&self) -> &[CompiledBlock] {
    &self.blocks
  }

  pub fn block(&self, block_id: u64) -> Option<&CompiledBlock> {
    self.index.get(&block_id).map(|&i| &self.blocks[i])
  }

  /// Every block id in a valid execution order.
  pub fn order(&self) -> &[u64] {
    &self.order
  }

  /// Process blocks whose prompt is blank; the executor skips them.
  pub fn skipped_blocks(&self) -> Vec<u64> {
    self
      .blocks
      .iter()
      .filter(|b| matches!(&b.kind, BlockKind::Process { prompt } if prompt.trim().is_empty()))
      .map(|b| b.block_id)
      .collect()
  }

  /// The run performed for each destination block, in list order.
  pub fn destinations(&self) -> Vec<DestinationPlan> {
    self
      .blocks
      .iter()
      .filter_map(|block| match &block.kind {
        BlockKind::Destination { email_dest } => Some(DestinationPlan {
          destination_id: block.block_id,
          email_dest: email_dest.clone(),
          execution_order: self.chain_order(block.block_id),
        }),
        _ => None,
      })
      .collect()
  }

  /// Dependencies of `block_id` (depth-first, prerequisites first), ordered
  /// topologically within the chain.
  fn chain_order(&self, block_id: u64) -> Vec<u64> {
    let chain = self.collect_chain(block_id);

    let position: HashMap<u64, usize> = chain.iter().enumerate().map(|(i, &id)| (id, i)).collect();
    let mut arcs = Vec::new();
    for (i, id) in chain.iter().enumerate() {
      if let Some(block) = self.block(*id) {
        for prereq in &block.pre_req {
          if let Some(&from) = position.get(prereq) {
            arcs.push((from, i));
          }
        }
      }
    }

    kahn(chain.len(), arcs)
      .sorted
      .into_iter()
      .map(|i| chain[i])
      .collect()
  }

  /// Post-order walk over `pre_req` with an explicit stack, so arbitrarily
  /// long chains from user input cannot exhaust the call stack.
  fn collect_chain(&self, block_id: u64) -> Vec<u64> {
    let mut chain = Vec::new();
    let mut visited = HashSet::new();
    // (block, prerequisites already pushed)
    let mut stack = vec![(block_id, false)];

    while let Some((id, expanded)) = stack.pop() {
      if expanded {
        chain.push(id);
        continue;
      }
      if !visited.insert(id) {
        continue;
      }
      stack.push((id, true));
      if let Some(block) = self.block(id) {
        for prereq in block.pre_req.iter().rev() {
          if !visited.contains(prereq) {
            stack.push((*prereq, false));
          }
        }
      }
    }

    chain
  }
}
