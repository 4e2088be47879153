use serde::{Deserialize, Serialize};

use crate::block::BlockType;

/// Canvas position of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
  pub x: f64,
  pub y: f64,
}

impl Position {
  pub fn new(x: f64, y: f64) -> Self {
    Self { x, y }
  }
}

/// Author of a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
  User,
  Assistant,
}

/// One entry of a process/visualize block's conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
  pub role: Role,
  pub content: String,
}

impl Message {
  pub fn user(content: impl Into<String>) -> Self {
    Self {
      role: Role::User,
      content: content.into(),
    }
  }

  pub fn assistant(content: impl Into<String>) -> Self {
    Self {
      role: Role::Assistant,
      content: content.into(),
    }
  }
}

/// Where an output block delivers its result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Destination {
  /// Send the final dataset to an email address.
  Email { address: String },
  /// Run a user-supplied script over the final dataset.
  Script { init_script: String },
}

/// Type-specific configuration of a node.
///
/// The `type` tag doubles as the node's [`BlockType`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeConfig {
  Input {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    #[serde(
      default,
      rename = "accountId",
      alias = "account_id",
      skip_serializing_if = "Option::is_none"
    )]
    account_id: Option<String>,
  },
  Process {
    #[serde(default)]
    conversation: Vec<Message>,
    #[serde(default)]
    goals: Vec<String>,
  },
  Visualize {
    #[serde(default)]
    conversation: Vec<Message>,
    #[serde(default)]
    goals: Vec<String>,
  },
  Output {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    destination: Option<Destination>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    schedule: Option<String>,
  },
}

impl NodeConfig {
  /// An unconfigured payload for the given block type.
  pub fn empty(block_type: BlockType) -> Self {
    match block_type {
      BlockType::Input => NodeConfig::Input {
        source: None,
        account_id: None,
      },
      BlockType::Process => NodeConfig::Process {
        conversation: Vec::new(),
        goals: Vec::new(),
      },
      BlockType::Visualize => NodeConfig::Visualize {
        conversation: Vec::new(),
        goals: Vec::new(),
      },
      BlockType::Output => NodeConfig::Output {
        destination: None,
        schedule: None,
      },
    }
  }

  pub fn block_type(&self) -> BlockType {
    match self {
      NodeConfig::Input { .. } => BlockType::Input,
      NodeConfig::Process { .. } => BlockType::Process,
      NodeConfig::Visualize { .. } => BlockType::Visualize,
      NodeConfig::Output { .. } => BlockType::Output,
    }
  }

  /// The most recent non-blank instruction written by the user, if any.
  ///
  /// Only process and visualize blocks carry a conversation.
  pub fn latest_instruction(&self) -> Option<&str> {
    match self {
      NodeConfig::Process { conversation, .. } | NodeConfig::Visualize { conversation, .. } => {
        conversation
          .iter()
          .rev()
          .filter(|m| m.role == Role::User)
          .map(|m| m.content.trim())
          .find(|c| !c.is_empty())
      }
      _ => None,
    }
  }

  /// Merge a partial update into this payload.
  ///
  /// Fields that do not belong to this block type are ignored, so the type of
  /// the payload never changes. Returns `true` if any field was written.
  pub fn merge(&mut self, patch: &NodePatch) -> bool {
    let mut changed = false;
    match self {
      NodeConfig::Input { source, account_id } => {
        if let Some(value) = &patch.source {
          *source = Some(value.clone());
          changed = true;
        }
        if let Some(value) = &patch.account_id {
          *account_id = Some(value.clone());
          changed = true;
        }
      }
      NodeConfig::Process {
        conversation,
        goals,
      }
      | NodeConfig::Visualize {
        conversation,
        goals,
      } => {
        if let Some(value) = &patch.conversation {
          *conversation = value.clone();
          changed = true;
        }
        if let Some(value) = &patch.goals {
          *goals = value.clone();
          changed = true;
        }
      }
      NodeConfig::Output {
        destination,
        schedule,
      } => {
        if let Some(value) = &patch.destination {
          *destination = Some(value.clone());
          changed = true;
        }
        if let Some(value) = &patch.schedule {
          *schedule = Some(value.clone());
          changed = true;
        }
      }
    }
    changed
  }
}

/// A partial update applied to a node by the configuration modal.
///
/// Every field is optional; `None` leaves the current value untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodePatch {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub title: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub source: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub account_id: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub conversation: Option<Vec<Message>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub goals: Option<Vec<String>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub destination: Option<Destination>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub schedule: Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_latest_instruction_skips_assistant_and_blank_messages() {
    let config = NodeConfig::Process {
      conversation: vec![
        Message::user("drop null rows"),
        Message::user("group by genre"),
        Message::assistant("done"),
        Message::user("   "),
      ],
      goals: vec![],
    };
    assert_eq!(config.latest_instruction(), Some("group by genre"));
  }

  #[test]
  fn test_latest_instruction_none_for_input() {
    let config = NodeConfig::empty(BlockType::Input);
    assert_eq!(config.latest_instruction(), None);
  }

  #[test]
  fn test_merge_ignores_foreign_fields() {
    let mut config = NodeConfig::empty(BlockType::Input);
    let patch = NodePatch {
      goals: Some(vec!["unused".to_string()]),
      ..Default::default()
    };
    assert!(!config.merge(&patch));
    assert_eq!(config, NodeConfig::empty(BlockType::Input));
  }

  #[test]
  fn test_merge_keeps_unpatched_fields() {
    let mut config = NodeConfig::Input {
      source: Some("movies.csv".to_string()),
      account_id: None,
    };
    let patch = NodePatch {
      account_id: Some("acct-7".to_string()),
      ..Default::default()
    };
    assert!(config.merge(&patch));
    assert_eq!(
      config,
      NodeConfig::Input {
        source: Some("movies.csv".to_string()),
        account_id: Some("acct-7".to_string()),
      }
    );
  }

  #[test]
  fn test_config_json_uses_type_tag() {
    let config = NodeConfig::Output {
      destination: Some(Destination::Email {
        address: "user@example.com".to_string(),
      }),
      schedule: None,
    };
    let json = serde_json::to_value(&config).unwrap();
    assert_eq!(
      json,
      serde_json::json!({
        "type": "output",
        "destination": { "kind": "email", "address": "user@example.com" }
      })
    );
  }
}
