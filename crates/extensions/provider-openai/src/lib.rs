//! OpenAI-compatible relevance scoring and reply generation for Vibey.
//!
//! Defaults target OpenRouter; any chat-completions endpoint works.

mod api;
mod client;
mod engagement_ai;
mod parse;
mod prompts;

pub use client::ChatClient;
pub use engagement_ai::OpenAIEngagementAi;
pub use parse::{MAX_REPLY_CHARS, clean_reply, parse_analysis};
