//! Normalization of executor answers.

use datagent_config::ExecutionResponse;
use serde::Deserialize;

/// Every field either response dialect may use.
///
/// The documented dialect is `{ success, message, processed_blocks, errors }`;
/// the pipeline executor also answers `{ status: "success", ... }` on success
/// and `{ error: "...", failed_block }` on failure.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawResponse {
  success: Option<bool>,
  status: Option<String>,
  message: Option<String>,
  error: Option<String>,
  processed_blocks: Option<u64>,
  destinations_processed: Option<u64>,
  failed_block: Option<u64>,
  #[serde(default)]
  errors: Vec<String>,
}

impl RawResponse {
  /// Whether the body speaks either dialect at all. A JSON object with none of
  /// `success`, `status` or `error` says nothing about the outcome.
  pub(crate) fn is_recognized(&self) -> bool {
    self.success.is_some() || self.status.is_some() || self.error.is_some()
  }

  pub(crate) fn normalize(self, http_status: u16) -> ExecutionResponse {
    let http_ok = (200..300).contains(&http_status);
    let reported = match (self.success, self.status.as_deref()) {
      (Some(success), _) => success,
      (None, Some(status)) => status == "success",
      (None, None) => false,
    };
    let success = http_ok && reported && self.error.is_none();

    let mut errors = self.errors;
    if let Some(block) = self.failed_block {
      errors.push(format!("block {block} failed"));
    }

    let message = self.error.or(self.message).or_else(|| {
      (!http_ok).then(|| format!("executor returned HTTP {http_status}"))
    });

    ExecutionResponse {
      success,
      message,
      processed_blocks: self.processed_blocks.or(self.destinations_processed),
      errors,
    }
  }
}
