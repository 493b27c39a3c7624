//! `vibey history <context-id>`: print an audit session.

use std::fmt::Write;

use serde_json::Value;

use vibey_audit_context::ContextAuditSink;
use vibey_config::Config;
use vibey_protocols::{AuditSink, SessionEvent, SessionEventKind};

const RULE_WIDTH: usize = 80;

pub(crate) const USAGE: &str = "Usage: vibey history <context-id>

The context id is logged when a run starts (\"Audit session: ctx_...\").";

pub(crate) async fn history(config: &Config, context_id: Option<&str>) -> i32 {
    let Some(context_id) = context_id.filter(|id| !id.trim().is_empty()) else {
        eprintln!("{}", USAGE);
        return 1;
    };

    let sink = match ContextAuditSink::from_config(&config.audit) {
        Ok(sink) => sink,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    println!("Fetching history...\n");
    match sink.history(context_id).await {
        Ok(events) => {
            print!("{}", format_history(context_id, &events));
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

/// Render a session the way the history viewer prints it.
pub(crate) fn format_history(context_id: &str, events: &[SessionEvent]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Context ID: {}", context_id);
    let _ = writeln!(out, "Total Messages: {}\n", events.len());
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));

    for (index, event) in events.iter().enumerate() {
        let _ = writeln!(
            out,
            "\n[{}] {}",
            index + 1,
            event.kind.to_string().to_uppercase()
        );
        let _ = writeln!(out, "Time: {}", event.timestamp.to_rfc3339());
        write_details(&mut out, event);
        let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
    }

    let _ = writeln!(out, "\nTotal: {} messages", events.len());
    out
}

fn write_details(out: &mut String, event: &SessionEvent) {
    match event.kind {
        SessionEventKind::Comment => {
            let _ = writeln!(out, "\nPost: {}", text_at(event, &["post", "text"]));
            let _ = writeln!(out, "URL: {}", text_at(event, &["post", "url"]));
            let _ = writeln!(out, "Comment: {}", text_at(event, &["comment"]));
            let _ = writeln!(
                out,
                "Analysis: {} ({})",
                text_at(event, &["analysis", "topic"]),
                text_at(event, &["analysis", "vibe"])
            );
        }
        SessionEventKind::Engagement => {
            let _ = writeln!(
                out,
                "\n{}",
                text_at(event, &["action"]).to_uppercase()
            );
            let _ = writeln!(out, "Post: {}", text_at(event, &["post", "text"]));
            let _ = writeln!(out, "URL: {}", text_at(event, &["post", "url"]));
        }
        SessionEventKind::Error => {
            let _ = writeln!(out, "\nError: {}", text_at(event, &["error"]));
            let _ = writeln!(out, "Context: {}", text_at(event, &["context"]));
        }
        SessionEventKind::SessionStart => {
            let _ = writeln!(out, "\nSession Started");
            let _ = writeln!(out, "Config: {}", pretty(event.field("config")));
        }
        SessionEventKind::SessionEnd => {
            let _ = writeln!(out, "\nSession Ended");
            let _ = writeln!(out, "Stats: {}", pretty(event.field("stats")));
            let minutes = event
                .field("duration")
                .and_then(Value::as_f64)
                .map(|ms| (ms / 1000.0 / 60.0).round() as i64);
            match minutes {
                Some(m) => {
                    let _ = writeln!(out, "Duration: {} minutes", m);
                }
                None => {
                    let _ = writeln!(out, "Duration: N/A");
                }
            }
        }
        SessionEventKind::Unknown => {}
    }
}

/// Nested string (or scalar) field, `N/A` when missing.
fn text_at(event: &SessionEvent, path: &[&str]) -> String {
    let Some((first, rest)) = path.split_first() else {
        return "N/A".to_string();
    };
    let mut value = event.field(first);
    for key in rest {
        value = value.and_then(|v| v.get(key));
    }
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => "N/A".to_string(),
        Some(other) => other.to_string(),
    }
}

fn pretty(value: Option<&Value>) -> String {
    value
        .and_then(|v| serde_json::to_string_pretty(v).ok())
        .unwrap_or_else(|| "N/A".to_string())
}
