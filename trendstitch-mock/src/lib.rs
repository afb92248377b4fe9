//! Mock trends connectors for CI-safe tests and demos.
//!
//! [`MockConnector`] behaves like a real trends vendor: the row spacing of a response
//! depends on the span requested, and every response is independently rescaled so its
//! own maximum is 100 and rounded to integers. Stitching output can therefore be checked
//! against the underlying curve in [`curve`].
//!
//! Special terms:
//! - `FAIL`: the fetch fails with a connector error.
//! - `TIMEOUT`: the fetch sleeps for five seconds before answering.
//! - `ZERO`: the term reports zero interest everywhere.
use std::time::Duration;

use async_trait::async_trait;
use trendstitch_core::connector::{InterestProvider, TrendsConnector};
use trendstitch_core::{Point, SegmentRequest, Series, StitchError};

pub mod curve;
mod dynamic;

pub use dynamic::{DynamicMockConnector, DynamicMockController, MockBehavior};

const NAME: &str = "trendstitch-mock";

/// Mock connector serving deterministic vendor-shaped responses.
pub struct MockConnector;

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConnector {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    async fn maybe_fail_or_timeout(
        req: &SegmentRequest,
        capability: &'static str,
    ) -> Result<(), StitchError> {
        if req.terms.iter().any(|t| t == "FAIL") {
            return Err(StitchError::connector(
                NAME,
                format!("forced failure: {capability}"),
            ));
        }
        if req.terms.iter().any(|t| t == "TIMEOUT") {
            // orchestrator may time out depending on config
            tokio::time::sleep(Duration::from_secs(5)).await;
        }
        Ok(())
    }
}

/// Answer `req` the way a trends vendor would.
///
/// Rows are keyed by period start at the window's native granularity and cover every
/// period that touches the window. Values are period means of the true curve, rescaled
/// so the response maximum is 100, then rounded half-to-even. A window with no interest
/// at all comes back as zeros.
///
/// # Errors
/// Returns `Data` only if the emulated rows violate series invariants.
pub fn emulate(req: &SegmentRequest) -> Result<Series, StitchError> {
    let g = req.native_granularity();
    let keys = curve::period_keys(req.start, req.end, g);
    let raw: Vec<Vec<f64>> = keys
        .iter()
        .map(|k| req.terms.iter().map(|t| curve::period_mean(t, *k, g)).collect())
        .collect();
    let max = raw
        .iter()
        .flatten()
        .copied()
        .fold(0.0_f64, f64::max);
    let points = keys
        .into_iter()
        .zip(raw)
        .map(|(date, values)| {
            let values = values
                .into_iter()
                .map(|v| {
                    if max > 0.0 {
                        (v / max * 100.0).round_ties_even()
                    } else {
                        0.0
                    }
                })
                .collect();
            Point::new(date, values)
        })
        .collect();
    Series::new(req.terms.as_slice().to_vec(), points)
}

impl TrendsConnector for MockConnector {
    fn name(&self) -> &'static str {
        NAME
    }

    fn vendor(&self) -> &'static str {
        "Mock"
    }

    fn as_interest_provider(&self) -> Option<&dyn InterestProvider> {
        Some(self as &dyn InterestProvider)
    }
}

#[async_trait]
impl InterestProvider for MockConnector {
    async fn interest(&self, req: SegmentRequest) -> Result<Series, StitchError> {
        Self::maybe_fail_or_timeout(&req, "interest").await?;
        emulate(&req)
    }
}
