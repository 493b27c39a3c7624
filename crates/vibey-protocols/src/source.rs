//! Automation backend capability trait.

use async_trait::async_trait;

use crate::error::SourceError;
use crate::types::{Post, RawPost};

/// Capability interface implemented by every automation backend.
///
/// The control loop only talks to the feed through this trait, so swapping
/// the browser library or login strategy never touches the loop itself.
/// Every method may fail; callers treat failures as non-fatal.
#[async_trait]
pub trait PostSource: Send + Sync {
    /// Backend identifier, for logs.
    fn id(&self) -> &str;

    /// Posts currently visible in the feed (possibly empty).
    async fn find_candidates(&self) -> Result<Vec<RawPost>, SourceError>;

    /// Extract a usable post, or `None` when the id or text is missing.
    async fn extract(&self, raw: &RawPost) -> Result<Option<Post>, SourceError>;

    /// Scroll the feed by `pixels`.
    async fn scroll(&self, pixels: u32) -> Result<(), SourceError>;

    /// Reload the feed.
    async fn refresh(&self) -> Result<(), SourceError>;

    /// Like a post.
    async fn like(&self, post: &Post) -> Result<(), SourceError>;

    /// Repost a post, including the confirmation step.
    async fn retweet(&self, post: &Post) -> Result<(), SourceError>;

    /// Open and focus the reply compose surface for a post.
    async fn open_reply_compose(&self, post: &Post) -> Result<(), SourceError>;

    /// Emit text into the focused compose surface.
    async fn type_text(&self, text: &str) -> Result<(), SourceError>;

    /// Submit the composed reply. `Ok(false)` when the submit control is unavailable.
    async fn submit_reply(&self, post: &Post, text: &str) -> Result<bool, SourceError>;

    /// Release the automation session.
    async fn close(&self) -> Result<(), SourceError> {
        Ok(())
    }
}
