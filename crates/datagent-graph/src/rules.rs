use datagent_config::BlockType;

/// The adjacency rule between block types.
///
/// | from \ to | input | process | visualize | output |
/// |-----------|-------|---------|-----------|--------|
/// | input     |       | yes     | yes       | yes    |
/// | process   |       | yes     | yes       | yes    |
/// | visualize |       |         |           | yes    |
/// | output    |       |         |           |        |
///
/// Inputs never receive edges and outputs never emit them. The answer carries
/// no detail; callers produce their own user-facing message.
pub fn is_connection_allowed(source: BlockType, target: BlockType) -> bool {
  use BlockType::*;

  matches!(
    (source, target),
    (Input | Process, Process | Visualize | Output) | (Visualize, Output)
  )
}
