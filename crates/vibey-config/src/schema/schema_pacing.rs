//! Pacing and engagement policy configuration.

use serde::{Deserialize, Serialize};

use super::DelayRange;

/// Randomized delay bounds for human-like interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Per-character typing delay.
    #[serde(default = "default_typing")]
    pub typing: DelayRange,

    /// Occasional pause while typing.
    #[serde(default = "default_thinking_pause")]
    pub thinking_pause: DelayRange,

    /// Chance of a thinking pause after each character.
    #[serde(default = "default_thinking_probability")]
    pub thinking_probability: f64,

    /// Wait after each posted reply.
    #[serde(default = "default_inter_comment")]
    pub inter_comment: DelayRange,

    /// Scroll magnitude, in pixels.
    #[serde(default = "default_scroll_distance_px")]
    pub scroll_distance_px: DelayRange,

    /// Settle time after a humanized scroll.
    #[serde(default = "default_scroll_settle")]
    pub scroll_settle: DelayRange,

    /// Pause after a like or retweet.
    #[serde(default = "default_after_action")]
    pub after_action: DelayRange,

    /// Pause after opening the reply composer.
    #[serde(default = "default_compose_open")]
    pub compose_open: DelayRange,

    /// Pause after focusing the compose box, before typing.
    #[serde(default = "default_compose_focus")]
    pub compose_focus: DelayRange,

    /// Pause between finishing typing and submitting.
    #[serde(default = "default_before_submit")]
    pub before_submit: DelayRange,

    /// Pause after submitting.
    #[serde(default = "default_after_submit")]
    pub after_submit: DelayRange,

    /// Pause after scrolling past a processed batch of posts.
    #[serde(default = "default_feed_settle")]
    pub feed_settle: DelayRange,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            typing: default_typing(),
            thinking_pause: default_thinking_pause(),
            thinking_probability: default_thinking_probability(),
            inter_comment: default_inter_comment(),
            scroll_distance_px: default_scroll_distance_px(),
            scroll_settle: default_scroll_settle(),
            after_action: default_after_action(),
            compose_open: default_compose_open(),
            compose_focus: default_compose_focus(),
            before_submit: default_before_submit(),
            after_submit: default_after_submit(),
            feed_settle: default_feed_settle(),
        }
    }
}

impl PacingConfig {
    /// Every range with its config path, for validation.
    pub fn ranges(&self) -> Vec<(&'static str, DelayRange)> {
        vec![
            ("pacing.typing", self.typing),
            ("pacing.thinking_pause", self.thinking_pause),
            ("pacing.inter_comment", self.inter_comment),
            ("pacing.scroll_distance_px", self.scroll_distance_px),
            ("pacing.scroll_settle", self.scroll_settle),
            ("pacing.after_action", self.after_action),
            ("pacing.compose_open", self.compose_open),
            ("pacing.compose_focus", self.compose_focus),
            ("pacing.before_submit", self.before_submit),
            ("pacing.after_submit", self.after_submit),
            ("pacing.feed_settle", self.feed_settle),
        ]
    }

    /// All delays collapsed to zero. Probabilities are left as configured.
    pub fn instant() -> Self {
        let zero = DelayRange::fixed(0);
        Self {
            typing: zero,
            thinking_pause: zero,
            inter_comment: zero,
            scroll_settle: zero,
            after_action: zero,
            compose_open: zero,
            compose_focus: zero,
            before_submit: zero,
            after_submit: zero,
            feed_settle: zero,
            ..Self::default()
        }
    }
}

fn default_typing() -> DelayRange {
    DelayRange::new(50, 150)
}

fn default_thinking_pause() -> DelayRange {
    DelayRange::new(500, 1500)
}

fn default_thinking_probability() -> f64 {
    0.1
}

fn default_inter_comment() -> DelayRange {
    DelayRange::new(5 * 60 * 1000, 15 * 60 * 1000)
}

fn default_scroll_distance_px() -> DelayRange {
    DelayRange::new(300, 800)
}

fn default_scroll_settle() -> DelayRange {
    DelayRange::new(1000, 3000)
}

fn default_after_action() -> DelayRange {
    DelayRange::new(500, 1500)
}

fn default_compose_open() -> DelayRange {
    DelayRange::new(1000, 2000)
}

fn default_compose_focus() -> DelayRange {
    DelayRange::new(300, 800)
}

fn default_before_submit() -> DelayRange {
    DelayRange::new(1000, 2000)
}

fn default_after_submit() -> DelayRange {
    DelayRange::fixed(2000)
}

fn default_feed_settle() -> DelayRange {
    DelayRange::new(2000, 4000)
}

/// Probabilities for optional engagement actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementConfig {
    /// Like before replying.
    #[serde(default = "default_like_probability")]
    pub like_probability: f64,

    /// Retweet before replying.
    #[serde(default = "default_retweet_probability")]
    pub retweet_probability: f64,

    /// Skip analysis and only like/retweet a post.
    #[serde(default = "default_engagement_only_probability")]
    pub engagement_only_probability: f64,

    #[serde(default = "default_engagement_only_like_probability")]
    pub engagement_only_like_probability: f64,

    #[serde(default = "default_engagement_only_retweet_probability")]
    pub engagement_only_retweet_probability: f64,
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self {
            like_probability: default_like_probability(),
            retweet_probability: default_retweet_probability(),
            engagement_only_probability: default_engagement_only_probability(),
            engagement_only_like_probability: default_engagement_only_like_probability(),
            engagement_only_retweet_probability: default_engagement_only_retweet_probability(),
        }
    }
}

impl EngagementConfig {
    /// Every probability with its config path, for validation.
    pub fn probabilities(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("engagement.like_probability", self.like_probability),
            ("engagement.retweet_probability", self.retweet_probability),
            (
                "engagement.engagement_only_probability",
                self.engagement_only_probability,
            ),
            (
                "engagement.engagement_only_like_probability",
                self.engagement_only_like_probability,
            ),
            (
                "engagement.engagement_only_retweet_probability",
                self.engagement_only_retweet_probability,
            ),
        ]
    }
}

fn default_like_probability() -> f64 {
    0.7
}

fn default_retweet_probability() -> f64 {
    0.2
}

fn default_engagement_only_probability() -> f64 {
    0.3
}

fn default_engagement_only_like_probability() -> f64 {
    0.8
}

fn default_engagement_only_retweet_probability() -> f64 {
    0.3
}
