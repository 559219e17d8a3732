use std::time::Duration;

/// Decision returned by the backoff policy after a counted failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Failure budget exhausted; stop.
    GiveUp,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Linear backoff with a bounded failure budget.
///
/// The delay after the `i`-th counted failure is
/// `initial + step * (i - 1)`: with the defaults 5s, 25s, 45s, 65s, …
/// An immediate retry often works; when it doesn't, back off hard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// Maximum number of counted attempts (including the first). At least 1.
    pub max_attempts: u32,
    /// Delay after the first failure.
    pub initial: Duration,
    /// Added per additional failure.
    pub step: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial: Duration::from_secs(5),
            step: Duration::from_secs(20),
        }
    }
}

impl BackoffPolicy {
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Backoff before the retry that follows failure number `failures` (1-based).
    pub fn backoff(&self, failures: u32) -> Duration {
        let extra = failures.saturating_sub(1);
        self.initial.saturating_add(self.step.saturating_mul(extra))
    }

    /// Decide what to do after failure number `failures` (1-based).
    pub fn decide(&self, failures: u32) -> RetryDecision {
        if failures >= self.max_attempts.max(1) {
            return RetryDecision::GiveUp;
        }
        RetryDecision::RetryAfter(self.backoff(failures))
    }
}
