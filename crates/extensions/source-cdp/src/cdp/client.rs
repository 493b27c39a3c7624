//! Browser-level CDP connection.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use serde_json::json;
use tracing::{debug, info, warn};

use super::error::CdpError;
use super::page::PageSession;
use super::protocol::{BrowserVersion, PageInfo};
use super::transport::{DEFAULT_COMMAND_TIMEOUT, Transport};

/// Connection to a Chrome instance started with remote debugging.
pub struct CdpClient {
    http_endpoint: String,
    http: reqwest::Client,
    transport: Arc<Transport>,
    recv_task: tokio::task::JoinHandle<()>,
}

impl CdpClient {
    /// Connect to Chrome at an HTTP debugging endpoint such as `http://localhost:9444`.
    pub async fn connect(endpoint: &str) -> Result<Self, CdpError> {
        let http_endpoint = endpoint.trim_end_matches('/').to_string();
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        let version_url = format!("{}/json/version", http_endpoint);
        debug!("Fetching browser version from {}", version_url);
        let version: BrowserVersion = http
            .get(&version_url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| CdpError::ChromeNotAvailable(format!("{}: {}", endpoint, e)))?
            .json()
            .await
            .map_err(|e| CdpError::ChromeNotAvailable(format!("{}: {}", endpoint, e)))?;

        let (ws_stream, _) = tokio_tungstenite::connect_async(&version.web_socket_debugger_url)
            .await
            .map_err(|e| CdpError::ConnectionFailed(format!("WebSocket: {}", e)))?;
        let (ws_sink, ws_source) = ws_stream.split();

        let transport = Arc::new(Transport::new(ws_sink, DEFAULT_COMMAND_TIMEOUT));
        let recv_task = {
            let transport = transport.clone();
            tokio::spawn(async move { transport.receive_loop(ws_source).await })
        };

        debug!("Connected to browser: {}", version.browser);
        Ok(Self {
            http_endpoint,
            http,
            transport,
            recv_task,
        })
    }

    /// [`connect`](Self::connect), retrying while the browser is still starting.
    pub async fn connect_with_retry(
        endpoint: &str,
        attempts: u32,
        retry_delay: Duration,
    ) -> Result<Self, CdpError> {
        let attempts = attempts.max(1);
        let mut last_error = None;
        for attempt in 1..=attempts {
            match Self::connect(endpoint).await {
                Ok(client) => {
                    info!("Connected to Chrome at {}", endpoint);
                    return Ok(client);
                }
                Err(e) => {
                    if attempt == 1 {
                        info!("Waiting for Chrome to start at {}...", endpoint);
                    }
                    debug!("Connect attempt {}/{} failed: {}", attempt, attempts, e);
                    last_error = Some(e);
                }
            }
            if attempt < attempts {
                tokio::time::sleep(retry_delay).await;
            }
        }
        warn!("Could not connect to Chrome after {} attempts", attempts);
        Err(last_error
            .unwrap_or_else(|| CdpError::ChromeNotAvailable(endpoint.to_string())))
    }

    /// Open tabs and other targets from `/json/list`.
    pub async fn list_pages(&self) -> Result<Vec<PageInfo>, CdpError> {
        let url = format!("{}/json/list", self.http_endpoint);
        Ok(self.http.get(&url).send().await?.json().await?)
    }

    /// Open a new tab and attach to it.
    pub async fn new_page(&self, url: Option<&str>) -> Result<PageSession, CdpError> {
        // Chrome requires PUT for /json/new.
        let create_url = match url {
            Some(u) => format!("{}/json/new?{}", self.http_endpoint, u),
            None => format!("{}/json/new", self.http_endpoint),
        };
        let page: PageInfo = self.http.put(&create_url).send().await?.json().await?;
        debug!("Created new page: {} - {}", page.id, page.url);
        self.attach_page(&page.id).await
    }

    /// Attach to an existing tab.
    pub async fn attach_page(&self, target_id: &str) -> Result<PageSession, CdpError> {
        let result = self
            .transport
            .call(
                "Target.attachToTarget",
                Some(json!({"targetId": target_id, "flatten": true})),
                None,
            )
            .await?;
        let session_id = result["sessionId"]
            .as_str()
            .ok_or_else(|| CdpError::InvalidResponse("Missing sessionId".to_string()))?;

        let session = PageSession::new(
            target_id.to_string(),
            session_id.to_string(),
            self.transport.clone(),
        );
        session.enable_domains().await?;
        Ok(session)
    }

    pub async fn close_page(&self, target_id: &str) -> Result<(), CdpError> {
        self.transport
            .call(
                "Target.closeTarget",
                Some(json!({"targetId": target_id})),
                None,
            )
            .await?;
        Ok(())
    }

    /// Close the WebSocket. The browser itself keeps running.
    pub async fn disconnect(&self) {
        self.transport.close().await;
        self.recv_task.abort();
    }
}

impl Drop for CdpClient {
    fn drop(&mut self) {
        self.recv_task.abort();
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
