//! State repositories.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::debug;

use vibey_protocols::{LogEntry, QuotaState, StateRepository, StoreError};

/// In-memory repository for testing.
#[derive(Default)]
pub struct MemoryStateRepository {
    quota: RwLock<Option<QuotaState>>,
    log: RwLock<Vec<LogEntry>>,
}

impl MemoryStateRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-seeded with quota state.
    pub fn with_quota(state: QuotaState) -> Self {
        Self {
            quota: RwLock::new(Some(state)),
            log: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl StateRepository for MemoryStateRepository {
    async fn load_quota(&self) -> Result<Option<QuotaState>, StoreError> {
        Ok(self.quota.read().await.clone())
    }

    async fn save_quota(&self, state: &QuotaState) -> Result<(), StoreError> {
        *self.quota.write().await = Some(state.clone());
        Ok(())
    }

    async fn load_log(&self) -> Result<Vec<LogEntry>, StoreError> {
        Ok(self.log.read().await.clone())
    }

    async fn save_log(&self, entries: &[LogEntry]) -> Result<(), StoreError> {
        *self.log.write().await = entries.to_vec();
        Ok(())
    }
}

/// JSON file repository.
///
/// Quota state and the event log live in two separate documents, each
/// rewritten in full on save:
/// ```text
/// commented-posts.json  {"posts": [...], "count": N, "lastReset": "..."}
/// bot-log.json          [{"timestamp": "...", "message": "...", ...}, ...]
/// ```
/// A missing file reads as "nothing persisted yet".
pub struct FileStateRepository {
    state_path: PathBuf,
    log_path: PathBuf,
}

impl FileStateRepository {
    pub fn new(state_path: impl Into<PathBuf>, log_path: impl Into<PathBuf>) -> Self {
        Self {
            state_path: state_path.into(),
            log_path: log_path.into(),
        }
    }

    pub fn state_path(&self) -> &Path {
        &self.state_path
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    async fn read_optional(path: &Path) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_document(path: &Path, content: String) -> Result<(), StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        fs::write(path, content).await?;
        debug!("Wrote {:?}", path);
        Ok(())
    }
}

#[async_trait]
impl StateRepository for FileStateRepository {
    async fn load_quota(&self) -> Result<Option<QuotaState>, StoreError> {
        match Self::read_optional(&self.state_path).await? {
            Some(content) => Ok(Some(serde_json::from_str(&content)?)),
            None => Ok(None),
        }
    }

    async fn save_quota(&self, state: &QuotaState) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(state)?;
        Self::write_document(&self.state_path, content).await
    }

    async fn load_log(&self) -> Result<Vec<LogEntry>, StoreError> {
        match Self::read_optional(&self.log_path).await? {
            Some(content) if content.trim().is_empty() => Ok(Vec::new()),
            Some(content) => Ok(serde_json::from_str(&content)?),
            None => Ok(Vec::new()),
        }
    }

    async fn save_log(&self, entries: &[LogEntry]) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(entries)?;
        Self::write_document(&self.log_path, content).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use tempfile::TempDir;
    use vibey_protocols::EngagementRecord;

    fn repo_in(dir: &TempDir) -> FileStateRepository {
        FileStateRepository::new(
            dir.path().join("commented-posts.json"),
            dir.path().join("bot-log.json"),
        )
    }

    #[tokio::test]
    async fn test_missing_files_read_as_empty() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir);
        assert!(repo.load_quota().await.unwrap().is_none());
        assert!(repo.load_log().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_quota_round_trip() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir);
        let now = Utc.with_ymd_and_hms(2026, 10, 15, 12, 0, 0).unwrap();
        let mut state = QuotaState::empty(now);
        state.posts.push(EngagementRecord {
            post_id: "1".to_string(),
            text: "text".to_string(),
            comment: "reply".to_string(),
            timestamp: now,
        });
        state.count = 1;

        repo.save_quota(&state).await.unwrap();
        let loaded = repo.load_quota().await.unwrap().unwrap();
        assert_eq!(loaded, state);
    }

    #[tokio::test]
    async fn test_corrupt_quota_is_an_error() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir);
        std::fs::write(repo.state_path(), "{not json").unwrap();
        assert!(matches!(
            repo.load_quota().await,
            Err(StoreError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn test_save_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let repo = FileStateRepository::new(
            dir.path().join("nested/state.json"),
            dir.path().join("nested/log.json"),
        );
        let entry = LogEntry::new(Utc::now(), "Bot initialized", json!({}));
        repo.save_log(&[entry]).await.unwrap();
        assert_eq!(repo.load_log().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_memory_repository() {
        let repo = MemoryStateRepository::new();
        assert!(repo.load_quota().await.unwrap().is_none());
        repo.save_quota(&QuotaState::empty(Utc::now())).await.unwrap();
        assert!(repo.load_quota().await.unwrap().is_some());
    }
}
