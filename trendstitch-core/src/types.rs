//! Re-export of foundational types from `trendstitch-types`.
// Consolidated re-exports so downstream crates can depend on `trendstitch-core` only

pub use trendstitch_types::{
    BackoffConfig, DateRange, FetchPath, Frequency, NATIVE_WINDOW_ROWS, Point, ReportRow,
    RunContext, SegmentRequest, Series, Stage, StitchConfig, StitchError, TermSet, TrendRequest,
};
