//! Invocation report shaping.
//!
//! The final result carries the full command/response transcript plus the
//! before/after server snapshots, so an orchestrator can audit exactly what
//! was sent and derive idempotency from the `changed` flag.

use crate::stat::ServerState;
use serde::{Deserialize, Serialize};

/// One command/response pair, recorded in the order it was issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRecord {
    /// Command line as sent, without the trailing newline
    pub command: String,
    /// Trimmed response text
    pub response: String,
}

impl CommandRecord {
    pub fn new(command: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            response: response.into(),
        }
    }
}

/// Structured result of one `apply` invocation.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Whether the before/after snapshots differ in status or weight
    pub changed: bool,
    /// Human-readable summary of what happened
    pub msg: String,
    /// Every captured command with its response, in order
    pub commands: Vec<CommandRecord>,
    /// Server states observed before any command was issued
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub before: Vec<ServerState>,
    /// Server states observed after the last command
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub after: Vec<ServerState>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_snapshots_are_omitted_from_json() {
        let report = Report {
            changed: false,
            msg: "no backend contained server 'web9'".to_string(),
            commands: Vec::new(),
            before: Vec::new(),
            after: Vec::new(),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("before").is_none());
        assert!(json.get("after").is_none());
        assert_eq!(json["changed"], serde_json::json!(false));
    }

    #[test]
    fn transcript_round_trips_through_json() {
        let record = CommandRecord::new("disable server www/web1", "");
        let json = serde_json::to_string(&record).unwrap();
        let back: CommandRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
