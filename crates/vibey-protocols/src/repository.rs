//! Persistence interface for quota state and the event log.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::types::{LogEntry, QuotaState};

/// Storage backend for the quota/state store.
///
/// Implementations rewrite the whole document on every save; there is no
/// partial update.
#[async_trait]
pub trait StateRepository: Send + Sync {
    /// Load quota state. `Ok(None)` when nothing has been persisted yet.
    async fn load_quota(&self) -> Result<Option<QuotaState>, StoreError>;

    /// Persist quota state in full.
    async fn save_quota(&self, state: &QuotaState) -> Result<(), StoreError>;

    /// Load the event log, oldest first.
    async fn load_log(&self) -> Result<Vec<LogEntry>, StoreError>;

    /// Persist the event log in full.
    async fn save_log(&self, entries: &[LogEntry]) -> Result<(), StoreError>;
}
