use serde::{Deserialize, Serialize};

/// Result of submitting a compiled pipeline to the executor.
///
/// Every outcome, including transport failures, is expressed in this shape
/// so callers have a single rendering path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResponse {
  pub success: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub message: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub processed_blocks: Option<u64>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub errors: Vec<String>,
}

impl ExecutionResponse {
  /// A failed result carrying a human-readable message.
  pub fn failure(message: impl Into<String>) -> Self {
    Self {
      success: false,
      message: Some(message.into()),
      processed_blocks: None,
      errors: Vec::new(),
    }
  }

  /// A successful result for a submission with nothing to run.
  pub fn empty() -> Self {
    Self {
      success: true,
      message: Some("no blocks to execute".to_string()),
      processed_blocks: Some(0),
      errors: Vec::new(),
    }
  }
}
