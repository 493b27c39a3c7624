//! Paced engagement actions.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use vibey_config::EngagementConfig;
use vibey_protocols::{Post, PostSource, SourceError};

use crate::pacing::Pacer;

/// Probabilities for the optional actions of one engagement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngageOptions {
    pub like_probability: f64,
    pub retweet_probability: f64,
}

impl EngageOptions {
    /// Options for a reply.
    pub fn for_reply(config: &EngagementConfig) -> Self {
        Self {
            like_probability: config.like_probability,
            retweet_probability: config.retweet_probability,
        }
    }

    /// Options for the like/retweet-only branch.
    pub fn for_engagement_only(config: &EngagementConfig) -> Self {
        Self {
            like_probability: config.engagement_only_like_probability,
            retweet_probability: config.engagement_only_retweet_probability,
        }
    }
}

impl Default for EngageOptions {
    fn default() -> Self {
        Self::for_reply(&EngagementConfig::default())
    }
}

/// A non-reply action performed on a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngagementAction {
    Like,
    Retweet,
}

impl EngagementAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngagementAction::Like => "like",
            EngagementAction::Retweet => "retweet",
        }
    }
}

impl fmt::Display for EngagementAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Drives like, retweet and reply through a post source with paced waits.
pub struct EngagementActuator {
    pacer: Arc<Pacer>,
}

impl EngagementActuator {
    pub fn new(pacer: Arc<Pacer>) -> Self {
        Self { pacer }
    }

    /// Optionally like and retweet, then reply. Returns whether the reply was
    /// submitted.
    ///
    /// Like and retweet failures are ignored. Any failure from opening the
    /// composer onward fails the whole engagement.
    pub async fn engage(
        &self,
        source: &dyn PostSource,
        post: &Post,
        comment: &str,
        options: &EngageOptions,
    ) -> bool {
        self.optional_actions(source, post, options).await;

        match self.reply(source, post, comment).await {
            Ok(true) => true,
            Ok(false) => {
                warn!("Reply to {} was not submitted", post.id);
                false
            }
            Err(e) => {
                warn!("Reply to {} failed: {}", post.id, e);
                false
            }
        }
    }

    /// Like and/or retweet without replying. Returns the actions that happened.
    pub async fn engage_only(
        &self,
        source: &dyn PostSource,
        post: &Post,
        options: &EngageOptions,
    ) -> Vec<EngagementAction> {
        self.optional_actions(source, post, options).await
    }

    async fn optional_actions(
        &self,
        source: &dyn PostSource,
        post: &Post,
        options: &EngageOptions,
    ) -> Vec<EngagementAction> {
        let mut done = Vec::new();
        let after = self.pacer.config().after_action;

        if self.pacer.roll(options.like_probability) {
            match source.like(post).await {
                Ok(()) => {
                    debug!("Liked {}", post.id);
                    done.push(EngagementAction::Like);
                    self.pacer.pause(after).await;
                }
                Err(e) => Self::log_optional_failure(EngagementAction::Like, post, &e),
            }
        }

        if self.pacer.roll(options.retweet_probability) {
            match source.retweet(post).await {
                Ok(()) => {
                    debug!("Retweeted {}", post.id);
                    done.push(EngagementAction::Retweet);
                    self.pacer.pause(after).await;
                }
                Err(e) => Self::log_optional_failure(EngagementAction::Retweet, post, &e),
            }
        }

        done
    }

    async fn reply(
        &self,
        source: &dyn PostSource,
        post: &Post,
        comment: &str,
    ) -> Result<bool, SourceError> {
        let pacing = self.pacer.config();

        source.open_reply_compose(post).await?;
        self.pacer.pause(pacing.compose_open).await;
        self.pacer.pause(pacing.compose_focus).await;

        self.pacer.humanized_type(source, comment).await?;
        self.pacer.pause(pacing.before_submit).await;

        let submitted = source.submit_reply(post, comment).await?;
        if submitted {
            self.pacer.pause(pacing.after_submit).await;
        }
        Ok(submitted)
    }

    fn log_optional_failure(action: EngagementAction, post: &Post, err: &SourceError) {
        if err.is_missing_element() {
            debug!("No {} control on {}: {}", action, post.id, err);
        } else {
            warn!("Could not {} {}: {}", action, post.id, err);
        }
    }
}

#[cfg(test)]
#[path = "actuator_tests.rs"]
mod tests;
