//! trendstitch-core
//!
//! Core types, traits, and algorithms shared across the trendstitch workspace.
//!
//! - `types`: re-exports of the shared data transfer objects.
//! - `connector`: the `TrendsConnector` trait and the `InterestProvider` role trait.
//! - `range`: date arithmetic for defaults, period snapping and fetch windows.
//! - `timeseries`: overlap anchoring, pairwise scaling, bucket averaging and
//!   normalization of interest series.
//!
//! Everything here is synchronous and pure apart from the connector traits, which
//! are `async` and object safe so the orchestrator can hold `Arc<dyn TrendsConnector>`.
#![warn(missing_docs)]

/// Connector capability traits and the primary `TrendsConnector` interface.
pub mod connector;
/// Date-range policy: defaults, period snapping, single-fetch classification.
pub mod range;
/// Series algorithms used to assemble one consistently scaled series.
pub mod timeseries;
pub mod types;

pub use connector::{InterestProvider, TrendsConnector};
pub use range::RangePolicy;
pub use timeseries::aggregate::aggregate;
pub use timeseries::anchor::overlap_anchor;
pub use timeseries::normalize::{NORMALIZED_MAX, normalize};
pub use timeseries::scale::{ScaleFactor, scale, scale_factor, stitch};
pub use types::*;
