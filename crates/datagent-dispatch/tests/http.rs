//! Dispatcher tests against a fake executor.

use std::time::Duration;

use datagent_config::{BlockKind, CompiledBlock};
use datagent_dispatch::{Dispatcher, DispatcherConfig, HttpDispatcher};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn pipeline() -> Vec<CompiledBlock> {
  vec![
    CompiledBlock {
      block_id: 1,
      kind: BlockKind::InputSource {
        csv_source: "HistoricalQuotes.csv".to_string(),
      },
      pre_req: vec![],
    },
    CompiledBlock {
      block_id: 2,
      kind: BlockKind::Process {
        prompt: "clean missing values".to_string(),
      },
      pre_req: vec![1],
    },
    CompiledBlock {
      block_id: 3,
      kind: BlockKind::Destination {
        email_dest: "user@example.com".to_string(),
      },
      pre_req: vec![2],
    },
  ]
}

fn dispatcher_for(server: &MockServer) -> HttpDispatcher {
  let config = DispatcherConfig::new(format!("{}/blocks/execute", server.uri()))
    .with_timeout(Duration::from_secs(5));
  HttpDispatcher::new(config).expect("failed to build dispatcher")
}

#[tokio::test]
async fn test_posts_block_list_as_json() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(path("/blocks/execute"))
    .and(body_json(serde_json::json!([
      { "block_id": 1, "block_type": "input_source", "csv_source": "HistoricalQuotes.csv" },
      { "block_id": 2, "block_type": "process", "prompt": "clean missing values", "pre_req": [1] },
      { "block_id": 3, "block_type": "destination", "email_dest": "user@example.com", "pre_req": [2] }
    ])))
    .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
      "success": true,
      "message": "pipeline executed",
      "processed_blocks": 3
    })))
    .expect(1)
    .mount(&server)
    .await;

  let response = dispatcher_for(&server).dispatch(&pipeline()).await;

  assert!(response.success);
  assert_eq!(response.message.as_deref(), Some("pipeline executed"));
  assert_eq!(response.processed_blocks, Some(3));
  assert!(response.errors.is_empty());
}

#[tokio::test]
async fn test_executor_failure_is_reported() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(path("/blocks/execute"))
    .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
      "success": false,
      "message": "pipeline failed",
      "errors": ["block 2: prompt produced invalid code"]
    })))
    .mount(&server)
    .await;

  let response = dispatcher_for(&server).dispatch(&pipeline()).await;

  assert!(!response.success);
  assert_eq!(
    response.errors,
    vec!["block 2: prompt produced invalid code".to_string()]
  );
}

#[tokio::test]
async fn test_legacy_error_body() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
      "error": "Input file not found: /data/HistoricalQuotes.csv"
    })))
    .mount(&server)
    .await;

  let response = dispatcher_for(&server).dispatch(&pipeline()).await;

  assert!(!response.success);
  assert_eq!(
    response.message.as_deref(),
    Some("Input file not found: /data/HistoricalQuotes.csv")
  );
}

#[tokio::test]
async fn test_non_json_error_status() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
    .mount(&server)
    .await;

  let response = dispatcher_for(&server).dispatch(&pipeline()).await;

  assert!(!response.success);
  let message = response.message.expect("failure should carry a message");
  assert!(message.contains("500"), "unexpected message: {message}");
  assert!(message.contains("Internal Server Error"));
}

#[tokio::test]
async fn test_unreadable_success_body() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
    .mount(&server)
    .await;

  let response = dispatcher_for(&server).dispatch(&pipeline()).await;

  assert!(!response.success);
  assert!(response.message.unwrap().contains("unreadable response"));
}

#[tokio::test]
async fn test_success_body_without_outcome_is_a_failure() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .respond_with(
      ResponseTemplate::new(200).set_body_json(serde_json::json!({ "detail": "Not Found" })),
    )
    .mount(&server)
    .await;

  let response = dispatcher_for(&server).dispatch(&pipeline()).await;

  assert!(!response.success);
  let message = response.message.expect("failure should carry a message");
  assert!(message.contains("missing success/status"), "{message}");
}

#[tokio::test]
async fn test_empty_pipeline_skips_the_network() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .respond_with(ResponseTemplate::new(200))
    .expect(0)
    .mount(&server)
    .await;

  let response = dispatcher_for(&server).dispatch(&[]).await;

  assert!(response.success);
  assert_eq!(response.processed_blocks, Some(0));
  assert!(response.message.is_some());
}

#[tokio::test]
async fn test_network_error_becomes_failed_response() {
  // Nothing listens on port 1.
  let config = DispatcherConfig::new("http://127.0.0.1:1/blocks/execute")
    .with_timeout(Duration::from_secs(2));
  let dispatcher = HttpDispatcher::new(config).unwrap();

  let response = dispatcher.dispatch(&pipeline()).await;

  assert!(!response.success);
  let message = response.message.expect("failure should carry a message");
  assert!(message.starts_with("request to executor failed"), "{message}");
}
