//! Discovery and per-post processing.

use serde_json::json;
use tracing::{debug, info, warn};

use vibey_protocols::{AnalysisResult, RawPost};

use crate::actuator::EngageOptions;
use crate::error::RunLoopResult;
use crate::run_loop::{EngagementLoop, PostOutcome};

const LOG_PREVIEW_CHARS: usize = 50;

impl EngagementLoop {
    /// Visible candidates. An empty feed is scrolled once; if still empty the
    /// feed is reloaded and an empty batch is returned.
    pub(crate) async fn discover(&self) -> RunLoopResult<Vec<RawPost>> {
        let found = self.source.find_candidates().await?;
        if !found.is_empty() {
            debug!("Found {} candidate posts", found.len());
            return Ok(found);
        }

        debug!("No posts visible, scrolling");
        self.pacer.humanized_scroll(self.source.as_ref()).await?;
        let found = self.source.find_candidates().await?;
        if !found.is_empty() {
            return Ok(found);
        }

        info!("Feed exhausted, refreshing");
        self.source.refresh().await?;
        self.pacer.pause(self.pacer.config().feed_settle).await;
        Ok(Vec::new())
    }

    /// Scroll past a processed batch.
    pub(crate) async fn advance_feed(&self) -> RunLoopResult<()> {
        self.pacer.humanized_scroll(self.source.as_ref()).await?;
        self.pacer.pause(self.pacer.config().feed_settle).await;
        Ok(())
    }

    /// Take one candidate through filtering, analysis, generation and actuation.
    pub(crate) async fn process_post(&self, raw: &RawPost) -> PostOutcome {
        let post = match self.source.extract(raw).await {
            Ok(Some(post)) => post,
            Ok(None) => {
                debug!("Skipping post without id or text");
                return PostOutcome::Skipped;
            }
            Err(e) => {
                debug!("Skipping unreadable post: {}", e);
                return PostOutcome::Skipped;
            }
        };

        if !self.seen.lock().insert(post.id.clone()) {
            return PostOutcome::Skipped;
        }
        if self.store.has_engaged(&post.id).await {
            debug!("Already commented on {}", post.id);
            return PostOutcome::Skipped;
        }

        let engagement = &self.settings.engagement;
        if self.pacer.roll(engagement.engagement_only_probability) {
            let options = EngageOptions::for_engagement_only(engagement);
            let actions = self
                .actuator
                .engage_only(self.source.as_ref(), &post, &options)
                .await;
            for action in &actions {
                self.audit.engagement(action.as_str(), &post).await;
            }
            debug!("Engagement only on {}: {:?}", post.id, actions);
            return PostOutcome::EngagedOnly(actions);
        }

        info!("Analyzing {}: {}", post.id, post.preview(LOG_PREVIEW_CHARS));
        let analysis = match self.relevance.analyze(&post).await {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!("Analysis failed for {}: {}", post.id, e);
                AnalysisResult::error()
            }
        };
        if !analysis.worth_commenting {
            debug!("Not worth commenting on {} ({})", post.id, analysis.topic);
            return PostOutcome::FilteredOut;
        }

        let comment = match self.generator.generate(&post, &analysis).await {
            Ok(Some(comment)) if !comment.trim().is_empty() => comment,
            Ok(_) => {
                warn!("No reply generated for {}", post.id);
                return PostOutcome::GenFailed;
            }
            Err(e) => {
                warn!("Reply generation failed for {}: {}", post.id, e);
                return PostOutcome::GenFailed;
            }
        };

        let options = EngageOptions::for_reply(engagement);
        if !self
            .actuator
            .engage(self.source.as_ref(), &post, &comment, &options)
            .await
        {
            self.audit
                .error(
                    "Failed to post comment",
                    json!({ "tweetId": post.id, "url": post.url }),
                )
                .await;
            return PostOutcome::Failure;
        }

        let count = self.store.save_record(&post.id, &post.text, &comment).await;
        self.store
            .append_log(
                "Comment posted",
                json!({
                    "tweetId": post.id,
                    "tweetText": post.preview(self.settings.text_preview_chars),
                    "comment": comment,
                    "analysis": analysis,
                    "count": count,
                }),
            )
            .await;
        self.audit.comment(&post, &comment, &analysis).await;
        PostOutcome::Success(count)
    }
}
