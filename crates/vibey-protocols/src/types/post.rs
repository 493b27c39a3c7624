//! Feed post types.

use serde::{Deserialize, Serialize};

/// A discovered but not yet extracted feed item.
///
/// `handle` is opaque to the core; only the backend that produced it can
/// interpret it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPost {
    pub handle: String,
}

impl RawPost {
    pub fn new(handle: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
        }
    }
}

/// Encoded visual snapshot of a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// MIME type, e.g. `image/png`.
    pub mime_type: String,
    /// Base64-encoded image bytes.
    pub data_base64: String,
}

impl Snapshot {
    pub fn png(data_base64: impl Into<String>) -> Self {
        Self {
            mime_type: "image/png".to_string(),
            data_base64: data_base64.into(),
        }
    }

    /// `data:` URL suitable for multimodal model input.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data_base64)
    }
}

/// A fully extracted post. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// Platform-stable identifier.
    pub id: String,
    pub text: String,
    pub snapshot: Option<Snapshot>,
    pub url: String,
    /// Backend handle the post was extracted from.
    pub handle: String,
}

impl Post {
    pub fn new(id: impl Into<String>, text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            snapshot: None,
            url: url.into(),
            handle: String::new(),
        }
    }

    pub fn with_snapshot(mut self, snapshot: Snapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    pub fn with_handle(mut self, handle: impl Into<String>) -> Self {
        self.handle = handle.into();
        self
    }

    /// Build a post from possibly missing fields; `None` when id or text is empty.
    pub fn from_parts(
        id: Option<String>,
        text: Option<String>,
        url: impl Into<String>,
    ) -> Option<Self> {
        let id = id.filter(|s| !s.trim().is_empty())?;
        let text = text.filter(|s| !s.trim().is_empty())?;
        Some(Self::new(id, text, url))
    }

    /// First `max_chars` characters of the text, for logs.
    pub fn preview(&self, max_chars: usize) -> String {
        super::truncate_chars(&self.text, max_chars)
    }
}

#[cfg(test)]
#[path = "post_tests.rs"]
mod tests;
