//! Audit channel errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Audit service disabled: {0}")]
    Disabled(String),

    #[error("Audit API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}
