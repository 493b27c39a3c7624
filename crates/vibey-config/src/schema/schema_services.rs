//! Browser, model provider and audit service configuration.

use serde::{Deserialize, Serialize};

/// How the browser session is acquired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectStrategy {
    /// Reuse the first open page of an already-running browser.
    #[default]
    Attach,
    /// Open a fresh page in the running browser.
    NewPage,
}

/// Browser (CDP) connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// DevTools HTTP endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_connect_attempts")]
    pub connect_attempts: u32,

    #[serde(default = "default_connect_retry_secs")]
    pub connect_retry_secs: u64,

    #[serde(default)]
    pub strategy: ConnectStrategy,

    /// Feed URL; when empty the search feed is built from `search_keywords`.
    #[serde(default)]
    pub home_url: Option<String>,

    #[serde(default = "default_search_keywords")]
    pub search_keywords: Vec<String>,

    /// Time allowed for a manual login when the page lands on a login flow.
    #[serde(default = "default_login_wait_secs")]
    pub login_wait_secs: u64,

    /// Capture a screenshot of each extracted post.
    #[serde(default = "default_capture_snapshots")]
    pub capture_snapshots: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            connect_attempts: default_connect_attempts(),
            connect_retry_secs: default_connect_retry_secs(),
            strategy: ConnectStrategy::default(),
            home_url: None,
            search_keywords: default_search_keywords(),
            login_wait_secs: default_login_wait_secs(),
            capture_snapshots: default_capture_snapshots(),
        }
    }
}

fn default_endpoint() -> String {
    "http://localhost:9444".to_string()
}

fn default_connect_attempts() -> u32 {
    15
}

fn default_connect_retry_secs() -> u64 {
    2
}

fn default_search_keywords() -> Vec<String> {
    ["leadership", "controversial", "CEO", "startup", "founder", "business"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_login_wait_secs() -> u64 {
    60
}

fn default_capture_snapshots() -> bool {
    true
}

/// OpenAI-compatible chat completion provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Filled from `OPENAI_API_KEY` when absent.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_provider_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Sent as `HTTP-Referer`.
    #[serde(default)]
    pub referer: Option<String>,

    /// Sent as `X-Title`.
    #[serde(default = "default_title")]
    pub title: Option<String>,

    #[serde(default = "default_analysis_max_tokens")]
    pub analysis_max_tokens: u32,

    #[serde(default = "default_analysis_temperature")]
    pub analysis_temperature: f32,

    #[serde(default = "default_reply_max_tokens")]
    pub reply_max_tokens: u32,

    #[serde(default = "default_reply_temperature")]
    pub reply_temperature: f32,

    /// Attach post snapshots as image input.
    #[serde(default)]
    pub vision: bool,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_provider_base_url(),
            model: default_model(),
            referer: None,
            title: default_title(),
            analysis_max_tokens: default_analysis_max_tokens(),
            analysis_temperature: default_analysis_temperature(),
            reply_max_tokens: default_reply_max_tokens(),
            reply_temperature: default_reply_temperature(),
            vision: false,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_provider_base_url() -> String {
    "https://openrouter.ai/api/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "nousresearch/hermes-3-llama-3.1-405b:free".to_string()
}

fn default_title() -> Option<String> {
    Some("Vibey".to_string())
}

fn default_analysis_max_tokens() -> u32 {
    200
}

fn default_analysis_temperature() -> f32 {
    0.7
}

fn default_reply_max_tokens() -> u32 {
    100
}

fn default_reply_temperature() -> f32 {
    0.9
}

fn default_timeout_secs() -> u64 {
    60
}

/// Placeholder value shipped in sample env files.
pub const AUDIT_KEY_PLACEHOLDER: &str = "your-ultracontext-api-key-here";

/// Remote session audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    #[serde(default = "default_audit_enabled")]
    pub enabled: bool,

    /// Filled from `ULTRACONTEXTAPI` when absent.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_audit_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: default_audit_enabled(),
            api_key: None,
            base_url: default_audit_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl AuditConfig {
    /// The key to use, if auditing is enabled and a real key is set.
    pub fn effective_api_key(&self) -> Option<&str> {
        if !self.enabled {
            return None;
        }
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty() && *k != AUDIT_KEY_PLACEHOLDER)
    }
}

fn default_audit_enabled() -> bool {
    true
}

fn default_audit_base_url() -> String {
    "https://api.ultracontext.ai/v1".to_string()
}
