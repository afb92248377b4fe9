//! Trendstitch data transfer objects and configuration primitives shared by every crate
//! in the workspace.
#![warn(missing_docs)]

mod config;
mod error;
mod frequency;
mod range;
mod report;
mod request;
mod series;

pub use config::{BackoffConfig, FetchPath, StitchConfig};
pub use error::{RunContext, Stage, StitchError};
pub use frequency::{Frequency, NATIVE_WINDOW_ROWS};
pub use range::DateRange;
pub use report::ReportRow;
pub use request::{SegmentRequest, TrendRequest};
pub use series::{Point, Series, TermSet};
