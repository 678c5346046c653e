//! Wire messages between the service and its worker.
//!
//! ```text
//! request   {"id": "7", "fn": "expand-tree-bfs", "args": [...]}
//! success   {"id": "7", "success": true, "result": ...}
//! failure   {"id": "7", "success": false, "error": "..."}
//! readiness {"type": "ready"}
//! ```
//!
//! Messages are one-shot and matched only by `id`, so replies may arrive in
//! any order. `fn` names a task from a closed set; no code crosses the wire.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// The computations a worker knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskKind {
    /// Expand an elimination tree exhaustively, breadth first.
    #[serde(rename = "expand-tree-bfs")]
    ExpandTreeBfs,
    /// Expand the single node addressed by a path.
    #[serde(rename = "expand-node")]
    ExpandNode,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExpandTreeBfs => "expand-tree-bfs",
            Self::ExpandNode => "expand-node",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A call sent to the worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub id: String,
    #[serde(rename = "fn")]
    pub task: TaskKind,
    pub args: Vec<Value>,
}

/// The worker's answer to one [`Request`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub id: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Reply {
    pub fn success(id: impl Into<String>, result: Value) -> Self {
        Self {
            id: id.into(),
            success: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            success: false,
            result: None,
            error: Some(error.into()),
        }
    }

    /// Turn the reply into the caller's result.
    pub fn into_result(self) -> Result<Value> {
        if self.success {
            Ok(self.result.unwrap_or(Value::Null))
        } else {
            Err(Error::TaskFailed(
                self.error.unwrap_or_else(|| "unknown error".to_string()),
            ))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    Ready,
}

/// The one-time readiness handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadySignal {
    #[serde(rename = "type")]
    pub kind: SignalKind,
}

impl ReadySignal {
    pub const fn new() -> Self {
        Self {
            kind: SignalKind::Ready,
        }
    }
}

impl Default for ReadySignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Anything the worker sends back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WorkerMessage {
    Ready(ReadySignal),
    Reply(Reply),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_wire_format() {
        let request = Request {
            id: "1".into(),
            task: TaskKind::ExpandTreeBfs,
            args: vec![json!(3)],
        };
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"id":"1","fn":"expand-tree-bfs","args":[3]}"#);
    }

    #[test]
    fn reply_wire_formats() {
        let ok = serde_json::to_string(&Reply::success("2", json!({"n": 1}))).unwrap();
        assert_eq!(ok, r#"{"id":"2","success":true,"result":{"n":1}}"#);

        let err = serde_json::to_string(&Reply::failure("3", "boom")).unwrap();
        assert_eq!(err, r#"{"id":"3","success":false,"error":"boom"}"#);
    }

    #[test]
    fn ready_wire_format() {
        let json = serde_json::to_string(&WorkerMessage::Ready(ReadySignal::new())).unwrap();
        assert_eq!(json, r#"{"type":"ready"}"#);
    }

    #[test]
    fn messages_parse_by_shape() {
        let ready: WorkerMessage = serde_json::from_str(r#"{"type":"ready"}"#).unwrap();
        assert_eq!(ready, WorkerMessage::Ready(ReadySignal::new()));

        let reply: WorkerMessage =
            serde_json::from_str(r#"{"id":"9","success":true,"result":null}"#).unwrap();
        match reply {
            WorkerMessage::Reply(r) => {
                assert_eq!(r.id, "9");
                assert_eq!(r.into_result().unwrap(), Value::Null);
            }
            other => panic!("expected reply, got {:?}", other),
        }
    }

    #[test]
    fn unknown_task_rejected() {
        let parsed = serde_json::from_str::<Request>(r#"{"id":"1","fn":"eval","args":[]}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn failure_reply_becomes_task_error() {
        let err = Reply::failure("4", "bad path").into_result().unwrap_err();
        assert!(matches!(err, Error::TaskFailed(ref m) if m == "bad path"));
    }
}
