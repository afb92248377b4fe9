use async_trait::async_trait;
use trendstitch_core::connector::{InterestProvider, TrendsConnector};
use trendstitch_core::{SegmentRequest, Series, StitchError};

use crate::config::HttpConfig;
use crate::transport::Transport;
use crate::vendor::Vendor;

/// Trends connector speaking vendor protocol `V` over HTTP.
pub struct HttpConnector<V> {
    vendor: V,
    transport: Transport,
}

impl<V: Vendor> HttpConnector<V> {
    /// Connect `vendor` using `cfg`.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the HTTP client cannot be built from `cfg`.
    pub fn new(vendor: V, cfg: HttpConfig) -> Result<Self, StitchError> {
        let transport = Transport::new(vendor.name(), cfg)?;
        Ok(Self { vendor, transport })
    }

    /// Transport shared by every call of this connector.
    #[must_use]
    pub const fn transport(&self) -> &Transport {
        &self.transport
    }
}

impl<V: Vendor + 'static> TrendsConnector for HttpConnector<V> {
    fn name(&self) -> &'static str {
        self.vendor.name()
    }

    fn vendor(&self) -> &'static str {
        self.vendor.label()
    }

    fn as_interest_provider(&self) -> Option<&dyn InterestProvider> {
        Some(self as &dyn InterestProvider)
    }
}

#[async_trait]
impl<V: Vendor + 'static> InterestProvider for HttpConnector<V> {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "trendstitch_http::interest",
            skip(self, req),
            fields(connector = self.vendor.name(), window = %req.timeframe()),
        )
    )]
    async fn interest(&self, req: SegmentRequest) -> Result<Series, StitchError> {
        let first = self.vendor.build_request(&self.transport, &req)?;
        let resp = self.transport.send("interest", first).await?;
        self.vendor
            .parse_response(&self.transport, resp, &req)
            .await
    }
}
