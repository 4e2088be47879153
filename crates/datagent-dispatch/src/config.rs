use std::time::Duration;

/// Endpoint the bundled executor listens on.
pub const DEFAULT_EXECUTOR_URL: &str = "http://localhost:8080/blocks/execute";

/// Configuration for [`HttpDispatcher`](crate::HttpDispatcher).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherConfig {
  /// URL the block list is POSTed to.
  pub executor_url: String,
  /// Upper bound for the whole request, executor work included.
  pub timeout: Duration,
}

impl DispatcherConfig {
  pub fn new(executor_url: impl Into<String>) -> Self {
    Self {
      executor_url: executor_url.into(),
      ..Self::default()
    }
  }

  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = timeout;
    self
  }
}

impl Default for DispatcherConfig {
  fn default() -> Self {
    Self {
      executor_url: DEFAULT_EXECUTOR_URL.to_string(),
      timeout: Duration::from_secs(120),
    }
  }
}
