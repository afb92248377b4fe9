//! trendstitch-http
//!
//! HTTP connectors for trendstitch. An [`HttpConnector`] pairs a [`Vendor`] protocol with
//! a [`Transport`] that owns authentication, per-request timeouts and retries.
//!
//! Vendors
//! - [`TimelineVendor`]: one synchronous JSON request per segment.
//! - [`ReportVendor`]: submit a report, poll its status until ready, download CSV.
//!
//! Behavior
//! - Transport errors, 429 and 5xx responses are retried with exponential backoff and
//!   jitter; other 4xx responses fail at once.
//! - Client-side timeouts surface as `ProviderTimeout`, malformed bodies as `Data`, and
//!   everything else as `Connector` tagged with the vendor's connector name.
#![warn(missing_docs)]

/// Connection, authentication, retry and polling settings.
pub mod config;
mod connector;
/// Error normalization from `reqwest`.
pub mod error;
/// Report status polling.
pub mod poll;
/// Retry with exponential backoff.
pub mod retry;
mod transport;
pub mod vendor;

pub use config::{Auth, HttpConfig, PollConfig, RetryConfig};
pub use connector::HttpConnector;
pub use error::map_http_err;
pub use poll::{ReportState, ReportStatus, poll_report};
pub use transport::Transport;
pub use vendor::{ReportVendor, TimelineVendor, Vendor};
