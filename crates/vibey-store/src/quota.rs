//! Quota, dedupe and event log policy.

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use vibey_protocols::{EngagementRecord, LogEntry, QuotaState, StateRepository, truncate_chars};

use crate::clock::{Clock, SystemClock};

const DEFAULT_LOG_MAX_ENTRIES: usize = 1000;
const DEFAULT_TEXT_PREVIEW_CHARS: usize = 100;

/// Daily quota and dedupe index over a [`StateRepository`].
///
/// Rollover is lazy: the count is zeroed on the first save after the
/// day-of-month changes. Comparing day-of-month alone means a reset is
/// missed when the last reset was exactly one month earlier.
///
/// Persistence failures are logged and never returned. An unreadable state
/// is treated as empty. An unreadable event log is never overwritten.
pub struct QuotaStore {
    repo: Arc<dyn StateRepository>,
    clock: Arc<dyn Clock>,
    log_max_entries: usize,
    text_preview_chars: usize,
}

impl QuotaStore {
    pub fn new(repo: Arc<dyn StateRepository>) -> Self {
        Self {
            repo,
            clock: Arc::new(SystemClock),
            log_max_entries: DEFAULT_LOG_MAX_ENTRIES,
            text_preview_chars: DEFAULT_TEXT_PREVIEW_CHARS,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_log_max_entries(mut self, max: usize) -> Self {
        self.log_max_entries = max.max(1);
        self
    }

    pub fn with_text_preview_chars(mut self, chars: usize) -> Self {
        self.text_preview_chars = chars;
        self
    }

    /// Current persisted state, or the empty default.
    pub async fn state(&self) -> QuotaState {
        match self.repo.load_quota().await {
            Ok(Some(state)) => state,
            Ok(None) => QuotaState::empty(self.clock.now()),
            Err(e) => {
                warn!("Failed to load quota state, using empty state: {}", e);
                QuotaState::empty(self.clock.now())
            }
        }
    }

    /// Replies counted today; 0 when the last reset was on another day.
    pub async fn today_count(&self) -> u32 {
        let state = self.state().await;
        if self.is_today(&state) { state.count } else { 0 }
    }

    /// Whether a reply to `post_id` has ever been recorded.
    pub async fn has_engaged(&self, post_id: &str) -> bool {
        self.state().await.contains(post_id)
    }

    /// Record a reply and return the count for today.
    pub async fn save_record(&self, post_id: &str, text: &str, comment: &str) -> u32 {
        let now = self.clock.now();
        let mut state = self.state().await;

        if !self.is_today(&state) {
            info!("New day, resetting comment count (was {})", state.count);
            state.count = 0;
            state.last_reset = now;
        }

        state.posts.push(EngagementRecord {
            post_id: post_id.to_string(),
            text: truncate_chars(text, self.text_preview_chars),
            comment: comment.to_string(),
            timestamp: now,
        });
        state.count += 1;

        if let Err(e) = self.repo.save_quota(&state).await {
            warn!("Failed to persist quota state: {}", e);
        }
        state.count
    }

    /// Append a time-stamped entry to the event log, keeping only the newest
    /// entries up to the configured cap.
    pub async fn append_log(&self, message: &str, payload: Value) {
        info!(event = message, "{}", payload);

        // An unreadable log is left as is rather than replaced.
        let mut entries = match self.repo.load_log().await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Failed to load event log, entry not persisted: {}", e);
                return;
            }
        };
        entries.push(LogEntry::new(self.clock.now(), message, payload));
        if entries.len() > self.log_max_entries {
            let excess = entries.len() - self.log_max_entries;
            entries.drain(..excess);
        }

        if let Err(e) = self.repo.save_log(&entries).await {
            warn!("Failed to persist event log: {}", e);
        }
    }

    /// The persisted event log, oldest first.
    pub async fn log_entries(&self) -> Vec<LogEntry> {
        self.repo.load_log().await.unwrap_or_else(|e| {
            warn!("Failed to load event log: {}", e);
            Vec::new()
        })
    }

    fn is_today(&self, state: &QuotaState) -> bool {
        self.clock.day_of_month(state.last_reset) == self.clock.day_of_month(self.clock.now())
    }
}

#[cfg(test)]
#[path = "quota_tests.rs"]
mod tests;
