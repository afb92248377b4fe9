//! Configuration types shared across the stitcher and connectors.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Which of the three terminal paths a run took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchPath {
    /// One fetch whose native granularity already matches the request.
    Direct,
    /// One fetch at a finer native granularity, averaged into period buckets.
    DirectAggregated,
    /// Several overlapping fetches rescaled against each other and normalized.
    Stitched,
}

impl FetchPath {
    /// Whether values on this path were rescaled across segments.
    #[must_use]
    pub const fn is_scaled(self) -> bool {
        matches!(self, Self::Stitched)
    }
}

/// Exponential backoff configuration for retrying upstream requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Minimum backoff delay in milliseconds.
    pub min_backoff_ms: u64,
    /// Maximum backoff delay in milliseconds.
    pub max_backoff_ms: u64,
    /// Exponential factor to increase delay after each failure (>= 1).
    pub factor: u32,
    /// Random jitter percentage [0, 100] added to each delay.
    pub jitter_percent: u8,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            min_backoff_ms: 500,
            max_backoff_ms: 30_000,
            factor: 2,
            jitter_percent: 20,
        }
    }
}

impl BackoffConfig {
    /// Base delay before the `attempt`-th retry (0-based), without jitter.
    ///
    /// Grows by `factor` per attempt and saturates at `max_backoff_ms`.
    #[must_use]
    pub fn base_delay_ms(&self, attempt: u32) -> u64 {
        let factor = u64::from(self.factor.max(1));
        let mut delay = self.min_backoff_ms;
        for _ in 0..attempt {
            delay = delay.saturating_mul(factor);
            if delay >= self.max_backoff_ms {
                return self.max_backoff_ms;
            }
        }
        delay.min(self.max_backoff_ms)
    }
}

/// Global configuration for the `Stitcher` orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StitchConfig {
    /// Timeout for each individual segment fetch.
    pub provider_timeout: Duration,
    /// Optional deadline for a whole run, covering every fetch it issues.
    pub request_timeout: Option<Duration>,
    /// Upper bound on fetches issued by the segmentation loop.
    ///
    /// Exceeding it fails the run; the series is never silently truncated.
    pub max_segments: usize,
}

impl Default for StitchConfig {
    fn default() -> Self {
        Self {
            provider_timeout: Duration::from_secs(30),
            request_timeout: None,
            max_segments: 64,
        }
    }
}
