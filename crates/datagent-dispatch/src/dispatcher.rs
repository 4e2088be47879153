//! Executor client.

use async_trait::async_trait;
use datagent_config::{CompiledBlock, ExecutionResponse};
use reqwest::Client;
use tracing::{error, info, instrument, warn};

use crate::config::DispatcherConfig;
use crate::error::DispatchError;
use crate::response::RawResponse;

/// Submits compiled pipelines for execution.
#[async_trait]
pub trait Dispatcher: Send + Sync {
  /// Submit `blocks` and report the outcome.
  ///
  /// Never fails: every problem is reported as `success: false` with a
  /// human-readable message.
  async fn dispatch(&self, blocks: &[CompiledBlock]) -> ExecutionResponse;
}

/// Dispatcher that POSTs the block list as JSON to an HTTP executor.
pub struct HttpDispatcher {
  client: Client,
  config: DispatcherConfig,
}

impl HttpDispatcher {
  pub fn new(config: DispatcherConfig) -> Result<Self, DispatchError> {
    let client = Client::builder()
      .timeout(config.timeout)
      .build()
      .map_err(DispatchError::Client)?;
    Ok(Self { client, config })
  }

  pub fn config(&self) -> &DispatcherConfig {
    &self.config
  }

  async fn submit(&self, blocks: &[CompiledBlock]) -> Result<ExecutionResponse, DispatchError> {
    let response = self
      .client
      .post(&self.config.executor_url)
      .json(blocks)
      .send()
      .await?;

    let status = response.status().as_u16();
    let body = response.text().await?;

    match serde_json::from_str::<RawResponse>(&body) {
      Ok(raw) if raw.is_recognized() => Ok(raw.normalize(status)),
      Ok(_) | Err(_) if !(200..300).contains(&status) => Err(DispatchError::Status { status, body }),
      Ok(_) => Err(DispatchError::InvalidResponse {
        message: "missing success/status field".to_string(),
      }),
      Err(e) => Err(DispatchError::InvalidResponse {
        message: e.to_string(),
      }),
    }
  }
}

#[async_trait]
impl Dispatcher for HttpDispatcher {
  #[instrument(name = "pipeline_dispatch", skip(self, blocks), fields(blocks = blocks.len()))]
  async fn dispatch(&self, blocks: &[CompiledBlock]) -> ExecutionResponse {
    if blocks.is_empty() {
      info!("nothing to dispatch");
      return ExecutionResponse::empty();
    }

    info!(executor_url = %self.config.executor_url, "pipeline_submitted");

    match self.submit(blocks).await {
      Ok(response) if response.success => {
        info!(processed_blocks = ?response.processed_blocks, "pipeline_succeeded");
        response
      }
      Ok(response) => {
        warn!(
          message = ?response.message,
          errors = ?response.errors,
          "pipeline_failed"
        );
        response
      }
      Err(e) => {
        error!(error = %e, "dispatch_failed");
        ExecutionResponse::failure(e.to_string())
      }
    }
  }
}
