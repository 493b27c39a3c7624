//! CDP error types.

use thiserror::Error;
use vibey_protocols::SourceError;

#[derive(Debug, Error)]
pub enum CdpError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error(
        "Chrome not available at {0}. Start Chrome with: chrome --remote-debugging-port=<port>"
    )]
    ChromeNotAvailable(String),

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    #[error("CDP error: {message} (code: {code})")]
    Protocol { code: i64, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("JavaScript error: {0}")]
    JavaScript(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Session closed")]
    SessionClosed,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for CdpError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        CdpError::WebSocket(e.to_string())
    }
}

impl From<reqwest::Error> for CdpError {
    fn from(e: reqwest::Error) -> Self {
        CdpError::Http(e.to_string())
    }
}

impl From<CdpError> for SourceError {
    fn from(e: CdpError) -> Self {
        match e {
            CdpError::ConnectionFailed(_)
            | CdpError::ChromeNotAvailable(_)
            | CdpError::WebSocket(_)
            | CdpError::SessionClosed => SourceError::NotConnected(e.to_string()),
            CdpError::NavigationFailed(msg) => SourceError::Navigation(msg),
            CdpError::ElementNotFound(selector) => SourceError::ElementNotFound(selector),
            CdpError::Timeout(msg) => SourceError::Timeout(msg),
            CdpError::JavaScript(msg) => SourceError::ActionFailed(msg),
            other => SourceError::Backend(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_to_source_error() {
        let err: SourceError = CdpError::ElementNotFound("[data-testid=\"like\"]".into()).into();
        assert!(err.is_missing_element());

        let err: SourceError = CdpError::SessionClosed.into();
        assert!(matches!(err, SourceError::NotConnected(_)));

        let err: SourceError = CdpError::Timeout("compose".into()).into();
        assert!(matches!(err, SourceError::Timeout(_)));

        let err: SourceError = CdpError::Protocol {
            code: -32000,
            message: "No node".into(),
        }
        .into();
        assert!(matches!(err, SourceError::Backend(_)));
    }
}
