//! Automation backend errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Backend not connected: {0}")]
    NotConnected(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Action failed: {0}")]
    ActionFailed(String),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

impl SourceError {
    /// Whether the error only means an optional element was absent.
    pub fn is_missing_element(&self) -> bool {
        matches!(self, SourceError::ElementNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_error_element_not_found() {
        let err = SourceError::ElementNotFound("[data-testid=\"like\"]".to_string());
        assert!(err.to_string().contains("Element not found"));
        assert!(err.is_missing_element());
    }

    #[test]
    fn test_source_error_action_failed() {
        let err = SourceError::ActionFailed("click intercepted".to_string());
        assert!(err.to_string().contains("click intercepted"));
        assert!(!err.is_missing_element());
    }

    #[test]
    fn test_source_error_timeout() {
        let err = SourceError::Timeout("compose box".to_string());
        assert!(err.to_string().contains("Timed out"));
    }

    #[test]
    fn test_source_error_debug() {
        let err = SourceError::NotConnected("http://localhost:9444".to_string());
        assert!(format!("{:?}", err).contains("NotConnected"));
    }
}
