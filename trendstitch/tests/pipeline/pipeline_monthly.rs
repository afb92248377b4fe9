use chrono::Datelike;
use trendstitch::{FetchPath, Frequency};

use crate::helpers::*;

#[tokio::test]
async fn monthly_short_span_is_aggregated() {
    let stitcher = mock_stitcher();
    let req = request(&["rust"], Frequency::Monthly, "2022-05-17", "2024-02-10");
    let out = stitcher.stitch(&req).await.unwrap();
    assert_eq!(out.path, FetchPath::DirectAggregated);
    assert_eq!(out.range.start(), d(2022, 5, 1));
    assert_eq!(out.range.end(), d(2024, 2, 29));
    assert_eq!(out.series.len(), 22);
    assert!(out.series.points().iter().all(|p| p.date.day() == 1));
}

#[tokio::test]
async fn monthly_long_span_is_direct() {
    let stitcher = mock_stitcher();
    let req = request(&["rust"], Frequency::Monthly, "2010-01-01", "2024-04-30");
    let out = stitcher.stitch(&req).await.unwrap();
    assert_eq!(out.path, FetchPath::Direct);
    assert_eq!(out.series.len(), 14 * 12 + 4);
}

#[tokio::test]
async fn monthly_defaults_cover_the_previous_year() {
    let stitcher = mock_stitcher();
    let req = trendstitch::TrendRequest::new(
        "acme",
        trendstitch::TermSet::new(["rust"]).unwrap(),
        Frequency::Monthly,
    );
    let out = stitcher.stitch(&req).await.unwrap();
    assert_eq!(out.range.start(), d(2023, 4, 1));
    assert_eq!(out.range.end(), d(2024, 4, 30));
    assert_eq!(out.path, FetchPath::DirectAggregated);
    // 2023-04-01 is a Saturday: the first weekly row starts in March and is kept
    assert_eq!(out.series.first_date(), Some(d(2023, 3, 1)));
    assert_eq!(out.series.len(), 14);
}
