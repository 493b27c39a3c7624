//! Injectable suspension.

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

/// Cooperative wait used by every paced action.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real wall-clock sleeps.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

/// Returns immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSleeper;

#[async_trait]
impl Sleeper for NoopSleeper {
    async fn sleep(&self, _duration: Duration) {}
}

/// Returns immediately and remembers every requested duration.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    recorded: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded(&self) -> Vec<Duration> {
        self.recorded.lock().clone()
    }

    pub fn total(&self) -> Duration {
        self.recorded.lock().iter().sum()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.recorded.lock().push(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recording_sleeper() {
        let sleeper = RecordingSleeper::new();
        sleeper.sleep(Duration::from_millis(10)).await;
        sleeper.sleep(Duration::from_millis(5)).await;
        assert_eq!(sleeper.recorded().len(), 2);
        assert_eq!(sleeper.total(), Duration::from_millis(15));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_sleeper_advances_time() {
        let start = tokio::time::Instant::now();
        TokioSleeper.sleep(Duration::from_secs(300)).await;
        assert!(start.elapsed() >= Duration::from_secs(300));
    }
}
