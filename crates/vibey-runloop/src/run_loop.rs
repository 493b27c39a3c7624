//! Engagement control loop.
//!
//! One post at a time:
//!
//! ```text
//! DISCOVERING -> FILTERING -> (SKIP | ANALYZING) -> (FILTERED_OUT | GENERATING)
//!             -> (GEN_FAILED | ACTUATING) -> (SUCCESS | FAILURE) -> DISCOVERING
//! ```
//!
//! The loop stops when today's count reaches the daily maximum, when
//! consecutive failures reach the threshold, or when the cancellation token
//! fires. Skips, filtered posts and generation failures never touch the
//! failure counter.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::Serialize;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use vibey_config::{Config, EngagementConfig};
use vibey_protocols::{PostSource, RelevanceService, ReplyGenerator};
use vibey_store::QuotaStore;

use crate::actuator::{EngagementAction, EngagementActuator};
use crate::audit_trail::AuditTrail;
use crate::pacing::Pacer;

/// Loop policy knobs.
#[derive(Debug, Clone)]
pub struct LoopSettings {
    pub max_comments_per_day: u32,
    pub max_consecutive_failures: u32,
    pub error_backoff: Duration,
    /// Periodic feed reload; `None` disables it.
    pub refresh_interval: Option<Duration>,
    pub engagement: EngagementConfig,
    /// Reported in the audit session start.
    pub keywords: Vec<String>,
    pub text_preview_chars: usize,
}

impl LoopSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_comments_per_day: config.quota.max_comments_per_day,
            max_consecutive_failures: config.runloop.max_consecutive_failures,
            error_backoff: Duration::from_secs(config.runloop.error_backoff_secs),
            refresh_interval: (config.runloop.refresh_interval_secs > 0)
                .then(|| Duration::from_secs(config.runloop.refresh_interval_secs)),
            engagement: config.engagement.clone(),
            keywords: config.browser.search_keywords.clone(),
            text_preview_chars: config.quota.text_preview_chars,
        }
    }
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    GoalReached,
    Aborted,
    Interrupted,
}

impl RunOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunOutcome::GoalReached => "goal_reached",
            RunOutcome::Aborted => "aborted",
            RunOutcome::Interrupted => "interrupted",
        }
    }

    /// Whether the process should exit successfully.
    pub fn is_success(&self) -> bool {
        !matches!(self, RunOutcome::Aborted)
    }
}

/// Result of processing a single candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostOutcome {
    /// Unreadable, already seen this run, or already replied to.
    Skipped,
    FilteredOut,
    GenFailed,
    EngagedOnly(Vec<EngagementAction>),
    /// Reply posted; carries today's count.
    Success(u32),
    Failure,
}

/// Counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    pub posts_seen: u32,
    pub comments_posted: u32,
    pub engagement_only: u32,
    pub skipped: u32,
    pub filtered_out: u32,
    pub generation_failures: u32,
    pub failures: u32,
    pub refreshes: u32,
}

/// Summary returned when the loop stops.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub stats: RunStats,
    pub today_count: u32,
    pub duration: Duration,
}

/// The engagement control loop.
pub struct EngagementLoop {
    pub(crate) source: Arc<dyn PostSource>,
    pub(crate) relevance: Arc<dyn RelevanceService>,
    pub(crate) generator: Arc<dyn ReplyGenerator>,
    pub(crate) store: Arc<QuotaStore>,
    pub(crate) pacer: Arc<Pacer>,
    pub(crate) actuator: EngagementActuator,
    pub(crate) audit: AuditTrail,
    pub(crate) settings: LoopSettings,
    pub(crate) seen: Mutex<HashSet<String>>,
    cancel: CancellationToken,
}

impl EngagementLoop {
    pub fn new(
        source: Arc<dyn PostSource>,
        relevance: Arc<dyn RelevanceService>,
        generator: Arc<dyn ReplyGenerator>,
        store: Arc<QuotaStore>,
        pacer: Arc<Pacer>,
        settings: LoopSettings,
    ) -> Self {
        Self {
            source,
            relevance,
            generator,
            store,
            actuator: EngagementActuator::new(pacer.clone()),
            pacer,
            audit: AuditTrail::disabled(),
            settings,
            seen: Mutex::new(HashSet::new()),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_audit(mut self, audit: AuditTrail) -> Self {
        self.audit = audit;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn audit(&self) -> &AuditTrail {
        &self.audit
    }

    /// Run until stopped, then close the source.
    pub async fn run(&self) -> RunReport {
        let started = Instant::now();
        let mut stats = RunStats::default();

        let initial = self.store.today_count().await;
        info!(
            "Starting engagement loop on {} ({}/{} today)",
            self.source.id(),
            initial,
            self.settings.max_comments_per_day
        );
        self.store
            .append_log(
                "Bot initialized",
                json!({
                    "todayCount": initial,
                    "maxCommentsPerDay": self.settings.max_comments_per_day,
                }),
            )
            .await;
        self.audit
            .start(self.settings.max_comments_per_day, &self.settings.keywords)
            .await;

        let outcome = self.drive(&mut stats).await;
        self.finish(outcome, stats, started).await
    }

    async fn drive(&self, stats: &mut RunStats) -> RunOutcome {
        let mut consecutive_failures = 0u32;
        let mut last_refresh = Instant::now();

        loop {
            if let Some(outcome) = self.check_stop(consecutive_failures).await {
                return outcome;
            }

            if self.refresh_due(last_refresh) {
                info!("Refreshing feed");
                last_refresh = Instant::now();
                stats.refreshes += 1;
                if let Err(e) = self.source.refresh().await {
                    let e = crate::error::RunLoopError::from(e);
                    if !self.on_loop_error(&e, &mut consecutive_failures, stats).await {
                        return RunOutcome::Interrupted;
                    }
                    continue;
                }
                self.pacer.pause(self.pacer.config().feed_settle).await;
            }

            let candidates = match self.discover().await {
                Ok(candidates) => candidates,
                Err(e) => {
                    if !self.on_loop_error(&e, &mut consecutive_failures, stats).await {
                        return RunOutcome::Interrupted;
                    }
                    continue;
                }
            };
            if candidates.is_empty() {
                last_refresh = Instant::now();
                stats.refreshes += 1;
                continue;
            }

            for raw in &candidates {
                if let Some(outcome) = self.check_stop(consecutive_failures).await {
                    return outcome;
                }
                stats.posts_seen += 1;

                match self.process_post(raw).await {
                    PostOutcome::Skipped => stats.skipped += 1,
                    PostOutcome::FilteredOut => stats.filtered_out += 1,
                    PostOutcome::GenFailed => stats.generation_failures += 1,
                    PostOutcome::EngagedOnly(_) => stats.engagement_only += 1,
                    PostOutcome::Failure => {
                        consecutive_failures += 1;
                        stats.failures += 1;
                        warn!(
                            "Consecutive failures: {}/{}",
                            consecutive_failures, self.settings.max_consecutive_failures
                        );
                    }
                    PostOutcome::Success(count) => {
                        consecutive_failures = 0;
                        stats.comments_posted += 1;
                        info!(
                            "Comment posted ({}/{})",
                            count, self.settings.max_comments_per_day
                        );
                        if count >= self.settings.max_comments_per_day {
                            break;
                        }
                        if !self.cancellable(self.pacer.inter_comment_wait()).await {
                            return RunOutcome::Interrupted;
                        }
                    }
                }
            }

            if let Some(outcome) = self.check_stop(consecutive_failures).await {
                return outcome;
            }
            if let Err(e) = self.advance_feed().await {
                if !self.on_loop_error(&e, &mut consecutive_failures, stats).await {
                    return RunOutcome::Interrupted;
                }
            }
        }
    }

    async fn check_stop(&self, consecutive_failures: u32) -> Option<RunOutcome> {
        if self.cancel.is_cancelled() {
            return Some(RunOutcome::Interrupted);
        }
        if self.store.today_count().await >= self.settings.max_comments_per_day {
            return Some(RunOutcome::GoalReached);
        }
        if consecutive_failures >= self.settings.max_consecutive_failures {
            return Some(RunOutcome::Aborted);
        }
        None
    }

    fn refresh_due(&self, last_refresh: Instant) -> bool {
        self.settings
            .refresh_interval
            .is_some_and(|interval| last_refresh.elapsed() >= interval)
    }

    /// Count an error raised outside per-post processing and back off.
    /// Returns false when interrupted during the backoff.
    async fn on_loop_error(
        &self,
        err: &crate::error::RunLoopError,
        consecutive_failures: &mut u32,
        stats: &mut RunStats,
    ) -> bool {
        *consecutive_failures += 1;
        stats.failures += 1;
        error!(
            "Error in main loop ({}/{}): {}",
            consecutive_failures, self.settings.max_consecutive_failures, err
        );
        self.audit
            .error(
                &err.to_string(),
                json!({ "context": "main_loop", "consecutiveFailures": *consecutive_failures }),
            )
            .await;
        self.cancellable(self.pacer.sleep(self.settings.error_backoff))
            .await
    }

    /// Await `fut` unless cancelled first. Returns false on cancellation.
    pub(crate) async fn cancellable<F, T>(&self, fut: F) -> bool
    where
        F: std::future::Future<Output = T>,
    {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => false,
            _ = fut => true,
        }
    }

    async fn finish(&self, outcome: RunOutcome, stats: RunStats, started: Instant) -> RunReport {
        let today_count = self.store.today_count().await;
        match outcome {
            RunOutcome::GoalReached => {
                info!("Daily goal reached: {} comments", today_count);
                self.store
                    .append_log("Daily goal reached", json!({ "count": today_count }))
                    .await;
            }
            RunOutcome::Aborted => {
                error!(
                    "Stopping after {} consecutive failures",
                    self.settings.max_consecutive_failures
                );
                self.store
                    .append_log(
                        "Stopped due to errors",
                        json!({ "consecutiveFailures": self.settings.max_consecutive_failures }),
                    )
                    .await;
            }
            RunOutcome::Interrupted => {
                info!("Interrupted, shutting down");
                self.store
                    .append_log("Interrupted", json!({ "count": today_count }))
                    .await;
            }
        }

        let duration = started.elapsed();
        let stats_json = serde_json::to_value(&stats).unwrap_or_default();
        self.audit.end(stats_json, outcome.as_str(), duration).await;

        if let Err(e) = self.source.close().await {
            warn!("Failed to close {}: {}", self.source.id(), e);
        }

        RunReport {
            outcome,
            stats,
            today_count,
            duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_from_config() {
        let mut config = Config::default();
        config.runloop.refresh_interval_secs = 0;
        config.quota.max_comments_per_day = 7;

        let settings = LoopSettings::from_config(&config);
        assert_eq!(settings.max_comments_per_day, 7);
        assert_eq!(settings.max_consecutive_failures, 5);
        assert_eq!(settings.error_backoff, Duration::from_secs(5));
        assert!(settings.refresh_interval.is_none());
        assert_eq!(settings.keywords.len(), 6);
    }

    #[test]
    fn test_outcome_exit_status() {
        assert!(RunOutcome::GoalReached.is_success());
        assert!(RunOutcome::Interrupted.is_success());
        assert!(!RunOutcome::Aborted.is_success());
        assert_eq!(RunOutcome::Aborted.as_str(), "aborted");
    }

    #[test]
    fn test_stats_serialize_camel_case() {
        let stats = RunStats {
            comments_posted: 2,
            ..Default::default()
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["commentsPosted"], 2);
        assert_eq!(json["generationFailures"], 0);
    }
}
