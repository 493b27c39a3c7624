//! Relevance analysis result.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Tone of a post as judged by the relevance service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Vibe {
    Professional,
    Casual,
    Controversial,
    Neutral,
    Other(String),
}

impl From<&str> for Vibe {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "professional" => Vibe::Professional,
            "casual" => Vibe::Casual,
            "controversial" => Vibe::Controversial,
            "neutral" | "" => Vibe::Neutral,
            other => Vibe::Other(other.to_string()),
        }
    }
}

impl From<String> for Vibe {
    fn from(s: String) -> Self {
        Vibe::from(s.as_str())
    }
}

impl From<Vibe> for String {
    fn from(v: Vibe) -> Self {
        v.to_string()
    }
}

impl fmt::Display for Vibe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Vibe::Professional => write!(f, "professional"),
            Vibe::Casual => write!(f, "casual"),
            Vibe::Controversial => write!(f, "controversial"),
            Vibe::Neutral => write!(f, "neutral"),
            Vibe::Other(s) => write!(f, "{}", s),
        }
    }
}

/// Output of the relevance service for one post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub worth_commenting: bool,
    #[serde(default = "default_topic")]
    pub topic: String,
    #[serde(default = "default_vibe")]
    pub vibe: Vibe,
}

fn default_topic() -> String {
    "unknown".to_string()
}

fn default_vibe() -> Vibe {
    Vibe::Neutral
}

impl AnalysisResult {
    pub fn new(worth_commenting: bool, topic: impl Into<String>, vibe: Vibe) -> Self {
        Self {
            worth_commenting,
            topic: topic.into(),
            vibe,
        }
    }

    /// Safe default when the service produced nothing usable.
    pub fn unknown() -> Self {
        Self::new(false, "unknown", Vibe::Neutral)
    }

    /// Safe default when the service call failed.
    pub fn error() -> Self {
        Self::new(false, "error", Vibe::Neutral)
    }
}
