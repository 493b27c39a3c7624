//! `vibey run`: wire the backends and drive the engagement loop.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use vibey_audit_context::ContextAuditSink;
use vibey_config::{Config, ConfigLoader, ConfigValidator, QuotaConfig};
use vibey_provider_openai::OpenAIEngagementAi;
use vibey_runloop::{
    AuditTrail, EngagementLoop, LoopSettings, Pacer, RunOutcome, TokioSleeper,
    install_interrupt_handler,
};
use vibey_source_cdp::XFeedSource;
use vibey_store::{FileStateRepository, QuotaStore};

/// Process exit code for a finished run.
pub(crate) fn exit_code(outcome: RunOutcome) -> i32 {
    if outcome.is_success() { 0 } else { 1 }
}

pub(crate) fn build_store(quota: &QuotaConfig) -> QuotaStore {
    let expand = |p: &std::path::Path| ConfigLoader::expand_path(&p.to_string_lossy());
    let repo = FileStateRepository::new(expand(&quota.state_file), expand(&quota.log_file));
    QuotaStore::new(Arc::new(repo))
        .with_log_max_entries(quota.log_max_entries)
        .with_text_preview_chars(quota.text_preview_chars)
}

fn build_audit(config: &Config) -> AuditTrail {
    match ContextAuditSink::from_config(&config.audit) {
        Ok(sink) => AuditTrail::new(Arc::new(sink)),
        Err(e) => {
            info!("Audit trail off: {}", e);
            AuditTrail::disabled()
        }
    }
}

/// Record a run that died before the loop started, in the event log and
/// as a one-shot audit session.
async fn record_fatal(
    store: &QuotaStore,
    audit: &AuditTrail,
    settings: &LoopSettings,
    message: &str,
    elapsed: Duration,
) {
    error!("Fatal error: {}", message);
    store
        .append_log("Fatal error", json!({"error": message}))
        .await;
    if audit
        .start(settings.max_comments_per_day, &settings.keywords)
        .await
        .is_some()
    {
        audit.error(message, json!({ "context": "fatal" })).await;
        audit.end(json!({}), "error", elapsed).await;
    }
}

async fn open_source(config: &Config) -> Result<XFeedSource, vibey_source_cdp::cdp::CdpError> {
    let source = XFeedSource::connect(config.browser.clone()).await?;
    source.open_feed().await?;
    Ok(source)
}

pub(crate) async fn run(config: Config) -> Result<i32, Box<dyn std::error::Error>> {
    let warnings = ConfigValidator::validate(&config)?.into_result()?;
    for warning in &warnings {
        warn!("Config: {}", warning);
    }

    let store = Arc::new(build_store(&config.quota));
    let today = store.today_count().await;
    let max = config.quota.max_comments_per_day;
    info!("Today's count: {}/{}", today, max);
    if today >= max {
        info!("Daily goal already reached, nothing to do");
        return Ok(0);
    }

    let cancel = CancellationToken::new();
    install_interrupt_handler(cancel.clone())?;

    let started = Instant::now();
    let settings = LoopSettings::from_config(&config);
    let audit = build_audit(&config);

    let source = match open_source(&config).await {
        Ok(source) => Arc::new(source),
        Err(e) => {
            record_fatal(&store, &audit, &settings, &e.to_string(), started.elapsed()).await;
            return Ok(1);
        }
    };

    let ai = Arc::new(OpenAIEngagementAi::new(config.provider.clone()));
    if !ai.is_configured() {
        warn!("No provider API key; every post will be filtered out");
    }

    let pacer = Arc::new(Pacer::new(config.pacing.clone(), Arc::new(TokioSleeper)));
    let engine = EngagementLoop::new(source, ai.clone(), ai, store, pacer, settings)
        .with_audit(audit)
        .with_cancellation(cancel);

    let report = engine.run().await;
    info!(
        "Run finished: {} ({}/{} today, {} posted, {} failures, {}s)",
        report.outcome.as_str(),
        report.today_count,
        max,
        report.stats.comments_posted,
        report.stats.failures,
        report.duration.as_secs()
    );
    if let Some(id) = engine.audit().session_id() {
        info!("View this session with: vibey history {}", id);
    }

    Ok(exit_code(report.outcome))
}
