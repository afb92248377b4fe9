//! Run pipeline: path selection, segmentation and assembly of one stitched series.
//!
//! - `plan`: pick `Direct`, `DirectAggregated` or `Stitched` from frequency and span
//! - `segment`: walk a long range backwards in overlapping windows
//! - `run`: the `Stitcher::stitch` entry point tying the stages together
pub(crate) mod plan;
mod run;
pub(crate) mod segment;

use chrono::NaiveDate;
use trendstitch_core::{DateRange, FetchPath, ScaleFactor, Series};

/// Result of one stitching run.
#[derive(Debug, Clone, PartialEq)]
pub struct StitchOutcome {
    /// Final series: stitched and normalized on the `Stitched` path, raw or averaged
    /// otherwise.
    pub series: Series,
    /// Path the run took.
    pub path: FetchPath,
    /// Resolved, aligned range the run covered.
    pub range: DateRange,
    /// Number of fetches issued.
    pub segments: usize,
    /// Overlap anchors, newest pair first.
    pub anchors: Vec<NaiveDate>,
    /// Factors applied while folding, oldest pair first.
    pub factors: Vec<ScaleFactor>,
    /// Whether the oldest segment was averaged from daily rows before stitching.
    pub tail_aggregated: bool,
    /// Vendor label of the connector that served the data.
    pub vendor: &'static str,
}

impl StitchOutcome {
    /// True when values were rescaled across segments and normalized.
    #[must_use]
    pub const fn is_scaled(&self) -> bool {
        self.path.is_scaled()
    }
}
