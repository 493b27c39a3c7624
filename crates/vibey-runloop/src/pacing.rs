//! Human-like pacing.
//!
//! Every delay is drawn uniformly from a configured [`DelayRange`]. Waiting
//! goes through a [`Sleeper`], so tests can seed the RNG and record delays
//! instead of sleeping.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use vibey_config::{DelayRange, PacingConfig};
use vibey_protocols::{PostSource, SourceError};

use crate::sleeper::Sleeper;

/// One character of a typing plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingStep {
    pub ch: char,
    /// Delay after emitting the character.
    pub delay: Duration,
    /// Extra thinking pause after the delay, if rolled.
    pub pause: Option<Duration>,
}

impl TypingStep {
    pub fn total(&self) -> Duration {
        self.delay + self.pause.unwrap_or_default()
    }
}

/// Randomized delay policy.
pub struct Pacer {
    config: PacingConfig,
    rng: Mutex<StdRng>,
    sleeper: Arc<dyn Sleeper>,
}

impl Pacer {
    pub fn new(config: PacingConfig, sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            config,
            rng: Mutex::new(StdRng::from_entropy()),
            sleeper,
        }
    }

    /// Deterministic pacer for tests and replays.
    pub fn with_seed(config: PacingConfig, sleeper: Arc<dyn Sleeper>, seed: u64) -> Self {
        Self {
            config,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            sleeper,
        }
    }

    pub fn config(&self) -> &PacingConfig {
        &self.config
    }

    /// Uniform integer in `[min, max]`. Bounds given in the wrong order are swapped.
    pub fn random_delay(&self, min: u64, max: u64) -> u64 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        if lo == hi {
            return lo;
        }
        self.rng.lock().gen_range(lo..=hi)
    }

    /// Sample a duration from a range.
    pub fn sample(&self, range: DelayRange) -> Duration {
        Duration::from_millis(self.random_delay(range.min_ms, range.max_ms))
    }

    /// True with probability `p`, clamped to `[0, 1]`.
    pub fn roll(&self, p: f64) -> bool {
        if p.is_nan() || p <= 0.0 {
            return false;
        }
        if p >= 1.0 {
            return true;
        }
        self.rng.lock().gen_bool(p)
    }

    /// Per-character delays for typing `text`.
    pub fn typing_plan(&self, text: &str) -> Vec<TypingStep> {
        text.chars()
            .map(|ch| {
                let delay = self.sample(self.config.typing);
                let pause = self
                    .roll(self.config.thinking_probability)
                    .then(|| self.sample(self.config.thinking_pause));
                TypingStep { ch, delay, pause }
            })
            .collect()
    }

    /// Type `text` one character at a time following a fresh typing plan.
    pub async fn humanized_type(
        &self,
        source: &dyn PostSource,
        text: &str,
    ) -> Result<(), SourceError> {
        let plan = self.typing_plan(text);
        let mut buf = [0u8; 4];
        for step in &plan {
            source.type_text(step.ch.encode_utf8(&mut buf)).await?;
            self.sleeper.sleep(step.delay).await;
            if let Some(pause) = step.pause {
                trace!("Thinking pause {:?}", pause);
                self.sleeper.sleep(pause).await;
            }
        }
        debug!("Typed {} characters", plan.len());
        Ok(())
    }

    /// Scroll by a random distance, then let the feed settle. Returns the distance.
    pub async fn humanized_scroll(&self, source: &dyn PostSource) -> Result<u32, SourceError> {
        let range = self.config.scroll_distance_px;
        let px = u32::try_from(self.random_delay(range.min_ms, range.max_ms)).unwrap_or(u32::MAX);
        source.scroll(px).await?;
        self.pause(self.config.scroll_settle).await;
        Ok(px)
    }

    /// Wait between two posted replies.
    pub async fn inter_comment_wait(&self) -> Duration {
        let wait = self.sample(self.config.inter_comment);
        debug!("Waiting {}s before next comment", wait.as_secs());
        self.sleeper.sleep(wait).await;
        wait
    }

    /// Sleep for a duration drawn from `range`.
    pub async fn pause(&self, range: DelayRange) -> Duration {
        let wait = self.sample(range);
        self.sleeper.sleep(wait).await;
        wait
    }

    /// Sleep for exactly `duration`.
    pub async fn sleep(&self, duration: Duration) {
        self.sleeper.sleep(duration).await;
    }
}

#[cfg(test)]
#[path = "pacing_tests.rs"]
mod tests;
