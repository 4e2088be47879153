use thiserror::Error;

/// Failures while talking to the executor.
///
/// These never escape [`Dispatcher::dispatch`](crate::Dispatcher::dispatch);
/// they are rendered into a failed response instead.
#[derive(Debug, Error)]
pub enum DispatchError {
  #[error("failed to build HTTP client: {0}")]
  Client(#[source] reqwest::Error),

  #[error("request to executor failed: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("executor returned HTTP {status}: {body}")]
  Status { status: u16, body: String },

  #[error("executor returned an unreadable response: {message}")]
  InvalidResponse { message: String },
}
