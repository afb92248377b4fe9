//! Trendstitch assembles long-range search interest into one consistently scaled series.
//!
//! Overview
//! - Trends vendors return interest at a granularity that depends on the span requested
//!   (daily under 270 days, weekly under 270 weeks, monthly beyond), and rescale every
//!   response so its own maximum is 100. Values from two responses are not comparable.
//! - For ranges too long to fetch at the requested granularity in one call, the
//!   `Stitcher` walks backwards in overlapping windows, rescales each older segment to
//!   its newer neighbour using sums over the overlap, and normalizes the result so its
//!   global maximum is 100.
//! - Shorter ranges are fetched in one call and, when the vendor answers at a finer
//!   granularity than requested, averaged into weekly or monthly buckets.
//!
//! Key behaviors and trade-offs
//! - Segments are fetched strictly sequentially: each window ends at the overlap anchor
//!   of the one after it.
//! - A zero overlap sum for any term aborts the run with `DegenerateScale`; the stitcher
//!   never emits an unscaled or partially scaled series.
//! - Every terminal error is a `StitchError::Failed` carrying the stage and the resolved
//!   range, frequency and terms.
//!
//! Examples
//! ```rust,ignore
//! use std::sync::Arc;
//! use trendstitch::{Frequency, Stitcher, TermSet, TrendReport, TrendRequest};
//!
//! let stitcher = Stitcher::builder()
//!     .with_connector(Arc::new(connector))
//!     .provider_timeout(std::time::Duration::from_secs(30))
//!     .build()?;
//!
//! let req = TrendRequest::new("acme", TermSet::new(["rust", "go"])?, Frequency::Daily)
//!     .start("2022-01-01")
//!     .region("US");
//! let outcome = stitcher.stitch(&req).await?;
//! let report = TrendReport::from_outcome(&outcome, &req, chrono::Utc::now())?;
//! println!("{}: {} rows", report.file_name(), report.rows().len());
//! ```
#![warn(missing_docs)]

pub(crate) mod core;
mod pipeline;
mod report;

pub use core::{Stitcher, StitcherBuilder};
pub use pipeline::StitchOutcome;
pub use report::TrendReport;

// Re-export core types for convenience
pub use trendstitch_core::{
    BackoffConfig, DateRange, FetchPath, Frequency, Point, ReportRow, RunContext, ScaleFactor,
    SegmentRequest, Series, Stage, StitchConfig, StitchError, TermSet, TrendRequest,
    TrendsConnector,
};
