//! Last-write-wins bookkeeping for overlapping dispatches.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use datagent_config::ExecutionResponse;
use tracing::debug;

/// Sequence token handed out when a dispatch starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DispatchTicket(u64);

impl DispatchTicket {
  pub fn sequence(self) -> u64 {
    self.0
  }
}

/// Keeps the response of the most recently *started* dispatch.
///
/// Dispatches may resolve in any order. A response is kept only if no
/// dispatch started after it has already reported.
#[derive(Debug, Default)]
pub struct DispatchTracker {
  issued: AtomicU64,
  latest: Mutex<Option<(DispatchTicket, ExecutionResponse)>>,
}

impl DispatchTracker {
  pub fn new() -> Self {
    Self::default()
  }

  /// Issue a ticket for a dispatch that is about to start.
  pub fn begin(&self) -> DispatchTicket {
    DispatchTicket(self.issued.fetch_add(1, Ordering::Relaxed) + 1)
  }

  /// Record a finished dispatch. Returns `false` if the response is stale
  /// and was dropped.
  pub fn complete(&self, ticket: DispatchTicket, response: ExecutionResponse) -> bool {
    let mut latest = self.latest.lock().unwrap_or_else(|e| e.into_inner());
    if let Some((current, _)) = latest.as_ref() {
      if *current > ticket {
        debug!(
          ticket = ticket.sequence(),
          current = current.sequence(),
          "stale dispatch response dropped"
        );
        return false;
      }
    }
    *latest = Some((ticket, response));
    true
  }

  /// The response currently on display, if any dispatch has finished.
  pub fn latest(&self) -> Option<ExecutionResponse> {
    let latest = self.latest.lock().unwrap_or_else(|e| e.into_inner());
    latest.as_ref().map(|(_, response)| response.clone())
  }
}
