//! Datagent Dispatch
//!
//! Submits a compiled block list to the external executor and reports the
//! outcome as an [`ExecutionResponse`]. Dispatching never returns an error:
//! transport failures and non-success answers are folded into a failed
//! response so callers have one rendering path.
//!
//! No retries happen here. [`DispatchTracker`] lets callers that fire several
//! dispatches keep only the newest result.
//!
//! [`ExecutionResponse`]: datagent_config::ExecutionResponse

mod config;
mod dispatcher;
mod error;
mod response;
mod tracker;

pub use config::{DEFAULT_EXECUTOR_URL, DispatcherConfig};
pub use dispatcher::{Dispatcher, HttpDispatcher};
pub use error::DispatchError;
pub use tracker::{DispatchTicket, DispatchTracker};
