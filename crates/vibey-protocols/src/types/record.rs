//! Persisted quota state and event log records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One successful reply, as persisted in the quota file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementRecord {
    #[serde(rename = "id")]
    pub post_id: String,
    /// Post text, truncated before persisting.
    pub text: String,
    pub comment: String,
    pub timestamp: DateTime<Utc>,
}

/// Daily quota state: every engaged post plus the count since the last reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaState {
    #[serde(default)]
    pub posts: Vec<EngagementRecord>,
    #[serde(default)]
    pub count: u32,
    pub last_reset: DateTime<Utc>,
}

impl QuotaState {
    /// Empty state whose reset point is `now`.
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            posts: Vec::new(),
            count: 0,
            last_reset: now,
        }
    }

    pub fn contains(&self, post_id: &str) -> bool {
        self.posts.iter().any(|p| p.post_id == post_id)
    }
}

/// Keys owned by [`LogEntry`] itself; payload keys with these names are
/// stored with a `data_` prefix.
const RESERVED_LOG_KEYS: [&str; 2] = ["timestamp", "message"];

/// One entry of the capped JSON event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub message: String,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl LogEntry {
    pub fn new(timestamp: DateTime<Utc>, message: impl Into<String>, payload: Value) -> Self {
        let payload = match payload {
            Value::Object(map) => map
                .into_iter()
                .map(|(key, value)| {
                    if RESERVED_LOG_KEYS.contains(&key.as_str()) {
                        (format!("data_{key}"), value)
                    } else {
                        (key, value)
                    }
                })
                .collect(),
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("data".to_string(), other);
                map
            }
        };
        Self {
            timestamp,
            message: message.into(),
            payload,
        }
    }
}
