//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod schema_pacing;
mod schema_services;

pub use schema_pacing::*;
pub use schema_services::*;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub quota: QuotaConfig,

    #[serde(default)]
    pub pacing: PacingConfig,

    #[serde(default)]
    pub engagement: EngagementConfig,

    #[serde(default)]
    pub runloop: LoopConfig,

    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub audit: AuditConfig,
}

/// Inclusive millisecond range for a randomized delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayRange {
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    /// A range that always yields `ms`.
    pub const fn fixed(ms: u64) -> Self {
        Self::new(ms, ms)
    }

    pub fn is_ordered(&self) -> bool {
        self.min_ms <= self.max_ms
    }
}

/// Daily quota and local persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaConfig {
    #[serde(default = "default_max_comments_per_day")]
    pub max_comments_per_day: u32,

    /// JSON file holding engaged posts and the daily count.
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,

    /// JSON file holding the capped event log.
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,

    #[serde(default = "default_log_max_entries")]
    pub log_max_entries: usize,

    /// Characters of post text kept in records and log lines.
    #[serde(default = "default_text_preview_chars")]
    pub text_preview_chars: usize,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            max_comments_per_day: default_max_comments_per_day(),
            state_file: default_state_file(),
            log_file: default_log_file(),
            log_max_entries: default_log_max_entries(),
            text_preview_chars: default_text_preview_chars(),
        }
    }
}

fn default_max_comments_per_day() -> u32 {
    100
}

fn default_state_file() -> PathBuf {
    PathBuf::from("./commented-posts.json")
}

fn default_log_file() -> PathBuf {
    PathBuf::from("./bot-log.json")
}

fn default_log_max_entries() -> usize {
    1000
}

fn default_text_preview_chars() -> usize {
    100
}

/// Control loop supervision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopConfig {
    /// Back-to-back failures that abort the run.
    #[serde(default = "default_max_consecutive_failures")]
    pub max_consecutive_failures: u32,

    /// Wait after an error outside per-post processing.
    #[serde(default = "default_error_backoff_secs")]
    pub error_backoff_secs: u64,

    /// Reload the feed after this many seconds (0 = never).
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            max_consecutive_failures: default_max_consecutive_failures(),
            error_backoff_secs: default_error_backoff_secs(),
            refresh_interval_secs: default_refresh_interval_secs(),
        }
    }
}

fn default_max_consecutive_failures() -> u32 {
    5
}

fn default_error_backoff_secs() -> u64 {
    5
}

fn default_refresh_interval_secs() -> u64 {
    600
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
