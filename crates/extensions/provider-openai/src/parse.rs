//! Model output parsing.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use vibey_protocols::AnalysisResult;

/// Replies longer than this are cut.
pub const MAX_REPLY_CHARS: usize = 280;

const QUOTES: [char; 2] = ['"', '\''];
const TYPOGRAPHIC_DASHES: [char; 4] = ['\u{2014}', '\u{2013}', '\u{2012}', '\u{2015}'];

/// Outermost `{...}` span, greedy across lines.
static JSON_OBJECT: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\{[\s\S]*\}").ok());

/// Parse the relevance verdict from free-form model output.
///
/// The outermost `{...}` span is decoded. Without one the result is
/// [`AnalysisResult::unknown`]; with an undecodable one it is
/// [`AnalysisResult::error`]. Missing fields take their defaults.
pub fn parse_analysis(content: &str) -> AnalysisResult {
    let Some(json) = extract_json_object(content) else {
        debug!("No JSON object in analysis output");
        return AnalysisResult::unknown();
    };
    match serde_json::from_str::<AnalysisResult>(json) {
        Ok(result) => result,
        Err(e) => {
            debug!("Undecodable analysis JSON: {}", e);
            AnalysisResult::error()
        }
    }
}

/// Normalize a generated reply. `None` when nothing is left.
///
/// Trims whitespace, strips one leading and one trailing quote character,
/// replaces typographic dashes with `-` and cuts to [`MAX_REPLY_CHARS`].
pub fn clean_reply(content: &str) -> Option<String> {
    let mut reply = content.trim();
    if let Some(rest) = reply.strip_prefix(QUOTES) {
        reply = rest;
    }
    if let Some(rest) = reply.strip_suffix(QUOTES) {
        reply = rest;
    }

    let cleaned: String = reply
        .chars()
        .map(|c| if TYPOGRAPHIC_DASHES.contains(&c) { '-' } else { c })
        .take(MAX_REPLY_CHARS)
        .collect();

    let cleaned = cleaned.trim();
    (!cleaned.is_empty()).then(|| cleaned.to_string())
}

fn extract_json_object(content: &str) -> Option<&str> {
    JSON_OBJECT.as_ref()?.find(content).map(|m| m.as_str())
}
