//! Chat completions HTTP client.

use std::time::Duration;

use tracing::debug;

use vibey_config::ProviderConfig;
use vibey_protocols::ProviderError;

use crate::api::{ApiRequest, ApiResponse};

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Minimal client for an OpenAI-compatible chat completions endpoint.
pub struct ChatClient {
    api_key: String,
    api_url: String,
    referer: Option<String>,
    title: Option<String>,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl ChatClient {
    /// Client against a custom URL with default headers and timeout.
    pub fn with_url(api_key: String, api_url: String) -> Self {
        Self::build(api_key, api_url, None, None, DEFAULT_TIMEOUT_SECS)
    }

    /// Client from configuration. Fails when no API key is configured.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ProviderError::NotConfigured("provider.api_key".to_string()))?;
        Ok(Self::build(
            api_key,
            config.base_url.clone(),
            config.referer.clone(),
            config.title.clone(),
            config.timeout_secs,
        ))
    }

    fn build(
        api_key: String,
        api_url: String,
        referer: Option<String>,
        title: Option<String>,
        timeout_secs: u64,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            api_key,
            api_url,
            referer,
            title,
            timeout_secs,
            client,
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Send a request and return the first choice's text.
    pub async fn complete(&self, api_request: &ApiRequest) -> Result<String, ProviderError> {
        let response = self.send_request(api_request).await?;
        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;
        if let Some(usage) = &api_response.usage {
            debug!("Completion used {} tokens", usage.total_tokens);
        }
        api_response
            .first_content()
            .ok_or_else(|| ProviderError::MalformedResponse("no message content".to_string()))
    }

    async fn send_request(
        &self,
        api_request: &ApiRequest,
    ) -> Result<reqwest::Response, ProviderError> {
        let mut request = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json");
        if let Some(referer) = &self.referer {
            request = request.header("HTTP-Referer", referer);
        }
        if let Some(title) = &self.title {
            request = request.header("X-Title", title);
        }

        let response = request.json(api_request).send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(self.timeout_secs)
            } else {
                ProviderError::Network(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status,
                message: text,
            });
        }

        Ok(response)
    }
}
