use async_trait::async_trait;

use crate::{SegmentRequest, Series, StitchError};

/// Focused role trait for connectors that return search interest over time.
#[async_trait]
pub trait InterestProvider: Send + Sync {
    /// Fetch interest for every term of `req` over its inclusive window.
    ///
    /// Implementations return rows at the window's native granularity
    /// (see [`SegmentRequest::native_granularity`]) with one column per requested
    /// term, in request order. They do not clip coarse rows to the window, so a
    /// weekly or monthly result may start on a period boundary before `req.start`.
    ///
    /// Retry policy, if any, lives inside the implementation; callers never retry.
    async fn interest(&self, req: SegmentRequest) -> Result<Series, StitchError>;
}

/// Main trait implemented by all trends data connectors.
///
/// Connectors advertise capabilities by returning role-trait objects, so new
/// capabilities can be added without breaking existing implementations.
pub trait TrendsConnector: Send + Sync {
    /// A stable identifier used in logs and error tags (e.g., "trendstitch-mock").
    fn name(&self) -> &'static str;

    /// Human-friendly vendor string, also used in output file names.
    fn vendor(&self) -> &'static str {
        "unknown"
    }

    /// Advertise interest capability by returning a usable trait object reference when supported.
    fn as_interest_provider(&self) -> Option<&dyn InterestProvider> {
        None
    }
}
