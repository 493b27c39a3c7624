//! Relevance scoring and reply generation services.

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::types::{AnalysisResult, Post};

/// Scores whether a post is worth replying to.
#[async_trait]
pub trait RelevanceService: Send + Sync {
    /// Analyze a post's text (and snapshot, if the implementation uses it).
    async fn analyze(&self, post: &Post) -> Result<AnalysisResult, ProviderError>;
}

/// Writes reply text for a post.
#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    /// Generate a reply. `Ok(None)` means nothing usable was produced.
    async fn generate(
        &self,
        post: &Post,
        analysis: &AnalysisResult,
    ) -> Result<Option<String>, ProviderError>;
}
