use std::fmt;

use serde::{Deserialize, Serialize};

/// The four pipeline stages a block can represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
  Input,
  Process,
  Visualize,
  Output,
}

impl BlockType {
  /// All block types, in pipeline order.
  pub const ALL: [BlockType; 4] = [
    BlockType::Input,
    BlockType::Process,
    BlockType::Visualize,
    BlockType::Output,
  ];

  /// Title given to a freshly created node of this type.
  pub fn default_title(self) -> &'static str {
    match self {
      BlockType::Input => "Input",
      BlockType::Process => "Process",
      BlockType::Visualize => "Visualize",
      BlockType::Output => "Output",
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      BlockType::Input => "input",
      BlockType::Process => "process",
      BlockType::Visualize => "visualize",
      BlockType::Output => "output",
    }
  }
}

impl fmt::Display for BlockType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}
