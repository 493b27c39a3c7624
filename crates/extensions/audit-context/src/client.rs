//! REST client for the context service audit API.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use vibey_config::AuditConfig;
use vibey_protocols::{AuditError, AuditSink, SessionEvent};

#[derive(Debug, Deserialize)]
struct CreatedContext {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ContextData {
    #[serde(default)]
    data: Vec<Value>,
}

/// [`AuditSink`] over the context service REST API.
pub struct ContextAuditSink {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl ContextAuditSink {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self::with_timeout(api_key, base_url, Duration::from_secs(30))
    }

    fn with_timeout(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Sink from configuration; fails when auditing is off or has no key.
    pub fn from_config(config: &AuditConfig) -> Result<Self, AuditError> {
        let api_key = config
            .effective_api_key()
            .ok_or_else(|| AuditError::Disabled("audit API key not configured".to_string()))?;
        Ok(Self::with_timeout(
            api_key,
            config.base_url.clone(),
            Duration::from_secs(config.timeout_secs),
        ))
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, AuditError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        Err(AuditError::Api { status, message })
    }

    fn network(e: reqwest::Error) -> AuditError {
        AuditError::Network(e.to_string())
    }
}

#[async_trait]
impl AuditSink for ContextAuditSink {
    async fn create_session(&self) -> Result<String, AuditError> {
        let response = self
            .client
            .post(self.url("contexts"))
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(Self::network)?;
        let created: CreatedContext = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| AuditError::InvalidResponse(e.to_string()))?;
        debug!("Created context {}", created.id);
        Ok(created.id)
    }

    async fn append(&self, session_id: &str, event: &SessionEvent) -> Result<(), AuditError> {
        let response = self
            .client
            .post(self.url(&format!("contexts/{}/messages", session_id)))
            .bearer_auth(&self.api_key)
            .json(event)
            .send()
            .await
            .map_err(Self::network)?;
        Self::check(response).await?;
        Ok(())
    }

    async fn history(&self, session_id: &str) -> Result<Vec<SessionEvent>, AuditError> {
        let response = self
            .client
            .get(self.url(&format!("contexts/{}", session_id)))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(Self::network)?;
        let body: ContextData = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| AuditError::InvalidResponse(e.to_string()))?;

        let mut events = Vec::with_capacity(body.data.len());
        for (index, raw) in body.data.into_iter().enumerate() {
            match serde_json::from_value::<SessionEvent>(raw) {
                Ok(event) => events.push(event),
                Err(e) => warn!("Skipping unreadable history item {}: {}", index, e),
            }
        }
        Ok(events)
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
