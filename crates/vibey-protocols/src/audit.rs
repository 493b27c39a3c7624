//! Remote audit session interface.

use async_trait::async_trait;

use crate::error::AuditError;
use crate::types::SessionEvent;

/// Remote context service holding per-session event history.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Create a new session and return its identifier.
    async fn create_session(&self) -> Result<String, AuditError>;

    /// Append one event to a session.
    async fn append(&self, session_id: &str, event: &SessionEvent) -> Result<(), AuditError>;

    /// Read back every event of a session, in order.
    async fn history(&self, session_id: &str) -> Result<Vec<SessionEvent>, AuditError>;
}
