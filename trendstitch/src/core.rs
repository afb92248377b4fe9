use std::sync::Arc;

use chrono::NaiveDate;
use trendstitch_core::{
    DateRange, RangePolicy, SegmentRequest, Series, StitchConfig, StitchError, TrendRequest,
    TrendsConnector,
};

/// Orchestrator that resolves date ranges, fetches segments and stitches them.
pub struct Stitcher {
    pub(crate) connector: Arc<dyn TrendsConnector>,
    pub(crate) cfg: StitchConfig,
    pub(crate) today: Option<NaiveDate>,
}

/// Builder for constructing a `Stitcher` with custom configuration.
pub struct StitcherBuilder {
    connector: Option<Arc<dyn TrendsConnector>>,
    cfg: StitchConfig,
    today: Option<NaiveDate>,
}

impl Default for StitcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StitcherBuilder {
    /// Create a new builder with default configuration and no connector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            connector: None,
            cfg: StitchConfig::default(),
            today: None,
        }
    }

    /// Register the connector every segment is fetched from.
    ///
    /// Segments of one run must come from the same source, since each vendor scales its
    /// responses independently. Registering again replaces the previous connector.
    #[must_use]
    pub fn with_connector(mut self, c: Arc<dyn TrendsConnector>) -> Self {
        self.connector = Some(c);
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, cfg: StitchConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Set the per-segment fetch timeout.
    #[must_use]
    pub const fn provider_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.cfg.provider_timeout = timeout;
        self
    }

    /// Set an overall deadline for one run.
    ///
    /// When exceeded, the run fails with a `RequestTimeout` error for `"stitch"`.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.cfg.request_timeout = Some(timeout);
        self
    }

    /// Bound the number of fetches one run may issue.
    #[must_use]
    pub const fn max_segments(mut self, n: usize) -> Self {
        self.cfg.max_segments = n;
        self
    }

    /// Pin "today" instead of reading the local clock. Defaults and the "not after
    /// yesterday" rule are evaluated against this date.
    #[must_use]
    pub const fn today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Build the `Stitcher`.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no connector has been registered via [`Self::with_connector`],
    /// or if `max_segments` is zero.
    pub fn build(self) -> Result<Stitcher, StitchError> {
        let Some(connector) = self.connector else {
            return Err(StitchError::InvalidArg(
                "no connector registered; add one via with_connector(...)".to_string(),
            ));
        };
        if self.cfg.max_segments == 0 {
            return Err(StitchError::InvalidArg(
                "max_segments must be at least 1".to_string(),
            ));
        }
        Ok(Stitcher {
            connector,
            cfg: self.cfg,
            today: self.today,
        })
    }
}

pub(crate) fn tag_err(connector: &str, e: StitchError) -> StitchError {
    match e {
        e @ (StitchError::ProviderTimeout { .. }
        | StitchError::Connector { .. }
        | StitchError::RequestTimeout { .. }
        | StitchError::Cancelled { .. }
        | StitchError::Unsupported { .. }
        | StitchError::Data(_)) => e,
        other => StitchError::Connector {
            connector: connector.to_string(),
            msg: other.to_string(),
        },
    }
}

impl Stitcher {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "trendstitch::core::provider_call_with_timeout",
            skip(fut),
            fields(
                connector = connector_name,
                capability = capability,
                timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            ),
        )
    )]
    pub(crate) async fn provider_call_with_timeout<T, Fut>(
        connector_name: &'static str,
        capability: &'static str,
        timeout: std::time::Duration,
        fut: Fut,
    ) -> Result<T, StitchError>
    where
        Fut: core::future::Future<Output = Result<T, StitchError>>,
    {
        (tokio::time::timeout(timeout, fut).await)
            .unwrap_or_else(|_| Err(StitchError::provider_timeout(connector_name, capability)))
    }

    /// Start building a new `Stitcher` instance.
    #[must_use]
    pub fn builder() -> StitcherBuilder {
        StitcherBuilder::new()
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &StitchConfig {
        &self.cfg
    }

    /// Vendor label of the registered connector.
    #[must_use]
    pub fn vendor(&self) -> &'static str {
        self.connector.vendor()
    }

    /// The date runs are evaluated against: the pinned date, or the local calendar date.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    /// Resolve a request's raw date strings into an aligned range.
    ///
    /// # Errors
    /// Returns `InvalidArg` for malformed dates, a start after the end, or a client id
    /// that cannot appear in a file name.
    pub fn resolve(&self, req: &TrendRequest) -> Result<DateRange, StitchError> {
        req.validate_client()?;
        RangePolicy::new(req.frequency, self.today())
            .resolve(req.start.as_deref(), req.end.as_deref())
    }

    /// Fetch one segment through the connector, bounded by the provider timeout.
    ///
    /// The result must be non-empty and carry exactly the requested terms in order.
    pub(crate) async fn fetch_segment(&self, seg: SegmentRequest) -> Result<Series, StitchError> {
        let c = &self.connector;
        let Some(ip) = c.as_interest_provider() else {
            return Err(StitchError::unsupported("interest"));
        };
        let expected = seg.terms.clone();
        let window = seg.timeframe();
        let series = Self::provider_call_with_timeout(
            c.name(),
            "interest",
            self.cfg.provider_timeout,
            ip.interest(seg),
        )
        .await
        .map_err(|e| tag_err(c.name(), e))?;

        if series.is_empty() {
            return Err(StitchError::Data(format!(
                "{} returned no rows for {window}",
                c.name()
            )));
        }
        if series.terms() != expected.as_slice() {
            return Err(StitchError::Data(format!(
                "{} returned terms {:?}, expected {expected}",
                c.name(),
                series.terms()
            )));
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(
            connector = c.name(),
            window = %window,
            rows = series.len(),
            "fetched segment"
        );
        Ok(series)
    }
}
