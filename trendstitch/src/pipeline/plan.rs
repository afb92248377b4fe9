use trendstitch_core::range::fits_single_fetch;
use trendstitch_core::{DateRange, FetchPath, Frequency};

/// Select the path for `range`, purely from its frequency and span.
///
/// - daily: direct under 270 days, stitched otherwise
/// - weekly: aggregated from daily rows under 270 days, direct under 270 weeks,
///   stitched otherwise
/// - monthly: aggregated under 270 weeks, direct otherwise
pub(crate) fn plan(range: &DateRange) -> FetchPath {
    let frequency = range.frequency();
    if !fits_single_fetch(range.start(), range.end(), frequency) {
        return FetchPath::Stitched;
    }
    if Frequency::native_for_span(range.span_days()) < frequency {
        FetchPath::DirectAggregated
    } else {
        FetchPath::Direct
    }
}
