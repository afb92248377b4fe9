use chrono::{Datelike, Weekday};
use trendstitch::{FetchPath, Frequency};

use crate::helpers::*;

#[tokio::test]
async fn weekly_short_span_is_aggregated_from_daily() {
    let (stitcher, ctrl) = emulating_stitcher().await;
    // Sunday through Saturday, 97 days
    let req = request(&["rust", "go"], Frequency::Weekly, "2024-01-07", "2024-04-13");
    let out = stitcher.stitch(&req).await.unwrap();

    assert_eq!(out.path, FetchPath::DirectAggregated);
    assert_eq!(out.segments, 1);
    // one row per week-start bucket covering the span
    assert_eq!(out.series.len(), 14);
    assert!(out
        .series
        .points()
        .iter()
        .all(|p| p.date.weekday() == Weekday::Sun));
    assert_eq!(out.series.first_date(), Some(d(2024, 1, 7)));
    assert_eq!(out.series.last_date(), Some(d(2024, 4, 7)));

    let log = ctrl.get_interest_requests().await;
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].native_granularity(), Frequency::Daily);
}

#[tokio::test]
async fn weekly_dates_are_snapped_before_fetching() {
    let stitcher = mock_stitcher();
    // Wednesday to Wednesday
    let req = request(&["rust"], Frequency::Weekly, "2024-01-10", "2024-03-13");
    let out = stitcher.stitch(&req).await.unwrap();
    assert_eq!(out.range.start(), d(2024, 1, 7));
    assert_eq!(out.range.end(), d(2024, 3, 16));
}

#[tokio::test]
async fn weekly_medium_span_is_direct() {
    let stitcher = mock_stitcher();
    let req = request(&["rust"], Frequency::Weekly, "2021-01-03", "2024-05-11");
    let out = stitcher.stitch(&req).await.unwrap();
    assert_eq!(out.path, FetchPath::Direct);
    assert_eq!(out.series.first_date(), Some(d(2021, 1, 3)));
    assert_eq!(out.series.last_date(), Some(d(2024, 5, 5)));
}

#[tokio::test]
async fn weekly_long_span_stitches_weekly_segments() {
    let (stitcher, ctrl) = emulating_stitcher().await;
    let req = request(&["rust", "go"], Frequency::Weekly, "2014-01-05", "2024-05-11");
    let out = stitcher.stitch(&req).await.unwrap();

    assert_eq!(out.path, FetchPath::Stitched);
    assert_eq!(out.segments, 3);
    assert_eq!(out.anchors, vec![d(2020, 6, 28), d(2016, 8, 21)]);
    assert!(!out.tail_aggregated);
    assert_eq!(out.series.len(), 540);
    assert_eq!(out.series.first_date(), Some(d(2014, 1, 5)));
    assert_eq!(out.series.last_date(), Some(d(2024, 5, 5)));
    assert_eq!(out.series.max_value(), Some(100.0));

    let log = ctrl.get_interest_requests().await;
    assert_eq!((log[0].start, log[0].end), (d(2019, 3, 16), d(2024, 5, 11)));
    assert_eq!((log[1].start, log[1].end), (d(2015, 5, 3), d(2020, 6, 28)));
    assert_eq!((log[2].start, log[2].end), (d(2014, 1, 5), d(2016, 8, 21)));
    assert!(log.iter().all(|r| r.native_granularity() == Frequency::Weekly));

    let err = max_error_vs_truth(&out.series, Frequency::Weekly);
    assert!(err < 3.0, "max deviation from truth was {err}");
}
