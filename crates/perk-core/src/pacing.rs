//! Randomized pacing between remote calls.

use std::time::Duration;

use rand::Rng;

/// Delay source used between remote calls so request timing does not form a
/// fixed cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacer {
    min: Duration,
    max: Duration,
}

impl Pacer {
    pub fn new(min: Duration, max: Duration) -> Self {
        let max = max.max(min);
        Self { min, max }
    }

    /// Profile for delays between task actions (view/like/share calls).
    pub fn action() -> Self {
        Self::new(Duration::from_millis(1_500), Duration::from_millis(4_000))
    }

    /// Profile for the shorter delays between pagination fetches.
    pub fn page() -> Self {
        Self::new(Duration::from_millis(500), Duration::from_millis(1_500))
    }

    /// Zero-delay profile for tests.
    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Picks the next delay without sleeping. Never exceeds `max`.
    pub fn next_delay(&self) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        rand::thread_rng().gen_range(self.min..=self.max)
    }

    /// Sleeps for a uniformly random duration in `[min, max]`.
    pub async fn pause(&self) {
        let delay = self.next_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
