//! Audit session events.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kind of an audit session event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEventKind {
    SessionStart,
    Comment,
    Engagement,
    Error,
    SessionEnd,
    /// Event written by some other client.
    #[serde(other)]
    Unknown,
}

impl fmt::Display for SessionEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionEventKind::SessionStart => "session_start",
            SessionEventKind::Comment => "comment",
            SessionEventKind::Engagement => "engagement",
            SessionEventKind::Error => "error",
            SessionEventKind::SessionEnd => "session_end",
            SessionEventKind::Unknown => "message",
        };
        write!(f, "{}", s)
    }
}

/// One event appended to an audit session.
///
/// Serialized flat: `{"type": ..., "timestamp": ..., ...payload}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionEvent {
    #[serde(rename = "type")]
    pub kind: SessionEventKind,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl SessionEvent {
    pub fn new(kind: SessionEventKind, timestamp: DateTime<Utc>, payload: Value) -> Self {
        let payload = match payload {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            kind,
            timestamp,
            payload,
        }
    }

    /// Payload field lookup.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }
}
