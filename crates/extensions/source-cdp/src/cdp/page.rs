//! Session attached to one browser tab.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::{Value, json};
use tracing::debug;

use super::error::CdpError;
use super::protocol::{BoxModel, MouseButton, MouseEventType, ScreenshotFormat, Viewport};
use super::transport::Transport;

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const LOAD_TIMEOUT: Duration = Duration::from_secs(60);

pub struct PageSession {
    target_id: String,
    session_id: String,
    transport: Arc<Transport>,
}

impl PageSession {
    pub(crate) fn new(target_id: String, session_id: String, transport: Arc<Transport>) -> Self {
        Self {
            target_id,
            session_id,
            transport,
        }
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Send a command scoped to this session.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.transport
            .call(method, params, Some(&self.session_id))
            .await
    }

    pub(crate) async fn enable_domains(&self) -> Result<(), CdpError> {
        self.call("Page.enable", None).await?;
        self.call("DOM.enable", None).await?;
        self.call("Runtime.enable", None).await?;
        debug!("Enabled CDP domains for session {}", self.session_id);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Runtime
    // ------------------------------------------------------------------

    /// Evaluate an expression and return its JSON value.
    pub async fn evaluate(&self, expression: &str) -> Result<Value, CdpError> {
        let result = self
            .call(
                "Runtime.evaluate",
                Some(json!({
                    "expression": expression,
                    "returnByValue": true,
                    "awaitPromise": true,
                })),
            )
            .await?;

        if let Some(exception) = result.get("exceptionDetails") {
            let text = exception["exception"]["description"]
                .as_str()
                .or_else(|| exception["text"].as_str())
                .unwrap_or("Unknown error");
            return Err(CdpError::JavaScript(text.to_string()));
        }
        Ok(result["result"]["value"].clone())
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    pub async fn navigate(&self, url: &str) -> Result<(), CdpError> {
        let result = self
            .call("Page.navigate", Some(json!({"url": url})))
            .await?;
        if let Some(error) = result.get("errorText").and_then(Value::as_str) {
            return Err(CdpError::NavigationFailed(format!("{}: {}", url, error)));
        }
        self.wait_for_load().await?;
        debug!("Navigated to {}", url);
        Ok(())
    }

    pub async fn reload(&self) -> Result<(), CdpError> {
        self.call("Page.reload", None).await?;
        self.wait_for_load().await
    }

    /// Poll `document.readyState` until the DOM is usable.
    pub async fn wait_for_load(&self) -> Result<(), CdpError> {
        let start = Instant::now();
        loop {
            // The old document may be torn down mid-navigation; keep polling.
            if let Ok(state) = self.evaluate("document.readyState").await {
                if matches!(state.as_str(), Some("complete" | "interactive")) {
                    return Ok(());
                }
            }
            if start.elapsed() > LOAD_TIMEOUT {
                return Err(CdpError::Timeout("Page load timeout".to_string()));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    pub async fn url(&self) -> Result<String, CdpError> {
        let result = self.evaluate("window.location.href").await?;
        Ok(result.as_str().unwrap_or_default().to_string())
    }

    // ------------------------------------------------------------------
    // DOM
    // ------------------------------------------------------------------

    pub async fn query_selector(&self, selector: &str) -> Result<Option<i64>, CdpError> {
        let doc = self
            .call("DOM.getDocument", Some(json!({"depth": 0})))
            .await?;
        let root = doc["root"]["nodeId"]
            .as_i64()
            .ok_or_else(|| CdpError::InvalidResponse("Missing root nodeId".to_string()))?;

        let result = self
            .call(
                "DOM.querySelector",
                Some(json!({"nodeId": root, "selector": selector})),
            )
            .await?;
        Ok(result["nodeId"].as_i64().filter(|id| *id != 0))
    }

    pub async fn wait_for_selector(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<i64, CdpError> {
        let start = Instant::now();
        loop {
            if let Some(node_id) = self.query_selector(selector).await? {
                return Ok(node_id);
            }
            if start.elapsed() > timeout {
                return Err(CdpError::Timeout(format!(
                    "Waiting for selector '{}' timed out",
                    selector
                )));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Box model of a node, `None` when it is not rendered.
    pub async fn box_model(&self, node_id: i64) -> Result<Option<BoxModel>, CdpError> {
        match self
            .call("DOM.getBoxModel", Some(json!({"nodeId": node_id})))
            .await
        {
            Ok(r) => Ok(Some(serde_json::from_value(r["model"].clone())?)),
            Err(CdpError::Protocol { code: -32000, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Scroll the node into view, then click the center of its content box.
    pub async fn click_node(&self, node_id: i64, label: &str) -> Result<(), CdpError> {
        self.call(
            "DOM.scrollIntoViewIfNeeded",
            Some(json!({"nodeId": node_id})),
        )
        .await?;
        let model = self
            .box_model(node_id)
            .await?
            .ok_or_else(|| CdpError::ElementNotFound(format!("{} (not visible)", label)))?;
        let (x, y) = model.center();
        self.click_at(x, y).await
    }

    /// Click the first element matching `selector`.
    pub async fn click_selector(&self, selector: &str) -> Result<(), CdpError> {
        let node_id = self
            .query_selector(selector)
            .await?
            .ok_or_else(|| CdpError::ElementNotFound(selector.to_string()))?;
        self.click_node(node_id, selector).await
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    pub async fn click_at(&self, x: f64, y: f64) -> Result<(), CdpError> {
        self.call(
            "Input.dispatchMouseEvent",
            Some(json!({
                "type": MouseEventType::MouseMoved,
                "x": x,
                "y": y,
                "button": MouseButton::None,
            })),
        )
        .await?;
        for event in [MouseEventType::MousePressed, MouseEventType::MouseReleased] {
            self.call(
                "Input.dispatchMouseEvent",
                Some(json!({
                    "type": event,
                    "x": x,
                    "y": y,
                    "button": MouseButton::Left,
                    "clickCount": 1,
                })),
            )
            .await?;
        }
        debug!("Clicked at ({:.0}, {:.0})", x, y);
        Ok(())
    }

    /// Insert text at the focused element.
    pub async fn insert_text(&self, text: &str) -> Result<(), CdpError> {
        self.call("Input.insertText", Some(json!({"text": text})))
            .await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Capture
    // ------------------------------------------------------------------

    /// Base64 screenshot, optionally clipped to a region.
    pub async fn screenshot(
        &self,
        format: ScreenshotFormat,
        clip: Option<&Viewport>,
    ) -> Result<String, CdpError> {
        let mut params = json!({"format": format});
        if let Some(c) = clip {
            params["clip"] = serde_json::to_value(c)?;
        }
        let result = self.call("Page.captureScreenshot", Some(params)).await?;
        result["data"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| CdpError::InvalidResponse("Missing screenshot data".to_string()))
    }
}
