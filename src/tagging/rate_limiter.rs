// Fixed-interval pacing for the tagging API.
//
// The UCREL API is shared and asks callers not to hammer it, so each text
// waits until at least `interval` has passed since the previous one was
// sent. The first text goes straight through.

use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};
use tracing::info;

/// Enforces a minimum gap between texts sent to the tagger.
#[derive(Clone)]
pub struct RateLimiter {
    interval: Duration,
    /// When the last text was let through
    last_sent: Arc<Mutex<Option<Instant>>>,
}

impl RateLimiter {
    /// Create a rate limiter that spaces texts `interval` apart.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_sent: Arc::new(Mutex::new(None)),
        }
    }

    /// Create a rate limiter that waits `seconds` between texts.
    pub fn from_secs(seconds: u64) -> Self {
        Self::new(Duration::from_secs(seconds))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait until `file` may be sent to the tagger. Returns how long it waited.
    ///
    /// The lock is held across the sleep so concurrent callers queue up in
    /// order instead of all waking at once.
    pub async fn wait_turn(&self, file: &Path) -> Duration {
        let mut last_sent = self.last_sent.lock().await;
        let waited = match *last_sent {
            Some(last) => self.interval.saturating_sub(last.elapsed()),
            None => Duration::ZERO,
        };

        if !waited.is_zero() {
            info!(
                file = %file.display(),
                wait_secs = waited.as_secs_f64(),
                "Waiting for the tagging API before sending file"
            );
            tokio::time::sleep(waited).await;
        }

        *last_sent = Some(Instant::now());
        waited
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_file_is_immediate() {
        let limiter = RateLimiter::from_secs(10);
        let start = Instant::now();
        let waited = limiter.wait_turn(Path::new("a.txt")).await;
        assert_eq!(waited, Duration::ZERO);
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_second_file_waits_for_interval() {
        let limiter = RateLimiter::new(Duration::from_millis(300));
        limiter.wait_turn(Path::new("a.txt")).await;
        let start = Instant::now();
        let waited = limiter.wait_turn(Path::new("b.txt")).await;
        let elapsed = start.elapsed();
        assert!(waited > Duration::from_millis(200), "reported {:?}", waited);
        assert!(
            elapsed >= Duration::from_millis(250),
            "Expected ~300ms delay, got {:?}",
            elapsed
        );
    }

    #[tokio::test]
    async fn test_clones_share_the_last_send() {
        let limiter = RateLimiter::new(Duration::from_millis(300));
        let other = limiter.clone();
        limiter.wait_turn(Path::new("a.txt")).await;
        let waited = other.wait_turn(Path::new("b.txt")).await;
        assert!(waited > Duration::ZERO);
    }

    #[tokio::test]
    async fn test_zero_interval_never_waits() {
        let limiter = RateLimiter::from_secs(0);
        let start = Instant::now();
        for name in ["a.txt", "b.txt", "c.txt"] {
            assert_eq!(limiter.wait_turn(Path::new(name)).await, Duration::ZERO);
        }
        assert!(start.elapsed() < Duration::from_millis(50));
        assert_eq!(limiter.interval(), Duration::ZERO);
    }
}
