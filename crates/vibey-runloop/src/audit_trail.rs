//! Best-effort remote session log.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use vibey_protocols::{AnalysisResult, AuditSink, Post, SessionEvent, SessionEventKind};

/// Writes session events to an [`AuditSink`].
///
/// Every failure is logged and dropped. Without a sink, or when session
/// creation fails, all calls are no-ops.
pub struct AuditTrail {
    sink: Option<Arc<dyn AuditSink>>,
    session_id: Mutex<Option<String>>,
}

impl AuditTrail {
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self {
            sink: Some(sink),
            session_id: Mutex::new(None),
        }
    }

    pub fn disabled() -> Self {
        Self {
            sink: None,
            session_id: Mutex::new(None),
        }
    }

    pub fn session_id(&self) -> Option<String> {
        self.session_id.lock().clone()
    }

    /// Create the session and record its start.
    pub async fn start(&self, max_comments_per_day: u32, keywords: &[String]) -> Option<String> {
        let sink = self.sink.as_ref()?;
        let id = match sink.create_session().await {
            Ok(id) => id,
            Err(e) => {
                warn!("Audit session unavailable: {}", e);
                return None;
            }
        };
        info!("Audit session: {}", id);
        *self.session_id.lock() = Some(id.clone());

        self.record(
            SessionEventKind::SessionStart,
            json!({
                "config": {
                    "maxCommentsPerDay": max_comments_per_day,
                    "targetKeywords": keywords,
                }
            }),
        )
        .await;
        Some(id)
    }

    pub async fn comment(&self, post: &Post, comment: &str, analysis: &AnalysisResult) {
        self.record(
            SessionEventKind::Comment,
            json!({
                "post": { "id": post.id, "text": post.text, "url": post.url },
                "comment": comment,
                "analysis": {
                    "topic": analysis.topic,
                    "vibe": analysis.vibe.to_string(),
                    "worth_commenting": analysis.worth_commenting,
                },
            }),
        )
        .await;
    }

    pub async fn engagement(&self, action: &str, post: &Post) {
        self.record(
            SessionEventKind::Engagement,
            json!({
                "action": action,
                "post": { "id": post.id, "text": post.text, "url": post.url },
            }),
        )
        .await;
    }

    pub async fn error(&self, message: &str, context: Value) {
        self.record(
            SessionEventKind::Error,
            json!({ "error": message, "context": context }),
        )
        .await;
    }

    /// Record the session summary.
    pub async fn end(&self, stats: Value, status: &str, duration: Duration) {
        self.record(
            SessionEventKind::SessionEnd,
            json!({
                "stats": stats,
                "status": status,
                "duration": duration.as_millis() as u64,
            }),
        )
        .await;
    }

    async fn record(&self, kind: SessionEventKind, payload: Value) {
        let Some(sink) = self.sink.as_ref() else {
            return;
        };
        let Some(session_id) = self.session_id() else {
            return;
        };
        let event = SessionEvent::new(kind, Utc::now(), payload);
        match sink.append(&session_id, &event).await {
            Ok(()) => debug!("Audit event {} appended", kind),
            Err(e) => warn!("Failed to append {} audit event: {}", kind, e),
        }
    }
}
