//! Compiled block wire format.
//!
//! A compiled pipeline is a JSON array of blocks submitted to the executor:
//!
//! ```json
//! [
//!   { "block_id": 1, "block_type": "input_source", "csv_source": "movies.csv" },
//!   { "block_id": 2, "block_type": "process", "prompt": "drop nulls", "pre_req": [1] },
//!   { "block_id": 3, "block_type": "destination", "email_dest": "a@b.c", "pre_req": [2] }
//! ]
//! ```

use serde::{Deserialize, Serialize};

/// One block of a compiled pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledBlock {
  pub block_id: u64,
  #[serde(flatten)]
  pub kind: BlockKind,
  /// Ids of the blocks this block depends on.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub pre_req: Vec<u64>,
}

/// Type-specific part of a compiled block, tagged by `block_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "block_type", rename_all = "snake_case")]
pub enum BlockKind {
  InputSource {
    #[serde(default, alias = "file_path")]
    csv_source: String,
  },
  Process {
    #[serde(default)]
    prompt: String,
  },
  Output {
    #[serde(default)]
    init_script: String,
  },
  Destination {
    #[serde(default)]
    email_dest: String,
  },
}

impl BlockKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      BlockKind::InputSource { .. } => "input_source",
      BlockKind::Process { .. } => "process",
      BlockKind::Output { .. } => "output",
      BlockKind::Destination { .. } => "destination",
    }
  }
}
