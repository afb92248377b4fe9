use chrono::Days;
use trendstitch::{FetchPath, Frequency};

use crate::helpers::*;

#[tokio::test]
async fn daily_400_days_stitches_two_segments() {
    let (stitcher, ctrl) = emulating_stitcher().await;
    let req = request(&["rust", "go"], Frequency::Daily, "2023-04-10", "2024-05-14");
    let out = stitcher.stitch(&req).await.expect("stitched");

    assert_eq!(out.path, FetchPath::Stitched);
    assert_eq!(out.segments, 2);
    assert_eq!(out.anchors, vec![d(2023, 10, 26)]);
    assert_eq!(out.factors.len(), 1);
    assert!(!out.tail_aggregated);

    // one row per calendar day, bounds included
    assert_eq!(out.series.len(), 401);
    assert_eq!(out.series.first_date(), Some(d(2023, 4, 10)));
    assert_eq!(out.series.last_date(), Some(d(2024, 5, 14)));
    assert_eq!(out.series.max_value(), Some(100.0));

    let log = ctrl.get_interest_requests().await;
    assert_eq!(log.len(), 2);
    assert_eq!((log[0].start, log[0].end), (d(2023, 8, 19), d(2024, 5, 14)));
    assert_eq!((log[1].start, log[1].end), (d(2023, 4, 10), d(2023, 10, 26)));
}

#[tokio::test]
async fn stitched_daily_tracks_the_true_curve() {
    let stitcher = mock_stitcher();
    let req = request(&["rust", "go"], Frequency::Daily, "2021-01-01", "2024-05-14");
    let out = stitcher.stitch(&req).await.expect("stitched");
    assert!(out.segments > 2);
    assert_eq!(out.anchors.len() + 1, out.segments);
    let err = max_error_vs_truth(&out.series, Frequency::Daily);
    assert!(err < 3.0, "max deviation from truth was {err}");
}

#[tokio::test]
async fn span_at_threshold_is_a_single_direct_fetch() {
    let (stitcher, ctrl) = emulating_stitcher().await;
    let end = d(2024, 5, 14);
    let start = end - Days::new(269);
    let req = request(
        &["rust"],
        Frequency::Daily,
        &start.to_string(),
        &end.to_string(),
    );
    let out = stitcher.stitch(&req).await.unwrap();
    assert_eq!(out.path, FetchPath::Direct);
    assert_eq!(out.segments, 1);
    assert!(out.anchors.is_empty());
    assert_eq!(out.series.len(), 270);
    assert_eq!(ctrl.get_interest_requests().await.len(), 1);

    // one more day crosses into stitching
    let longer = request(
        &["rust"],
        Frequency::Daily,
        &(start - Days::new(1)).to_string(),
        &end.to_string(),
    );
    let out = stitcher.stitch(&longer).await.unwrap();
    assert_eq!(out.path, FetchPath::Stitched);
    assert_eq!(out.series.len(), 271);
}

#[tokio::test]
async fn future_end_is_clamped_to_yesterday() {
    let stitcher = mock_stitcher();
    let req = request(&["rust"], Frequency::Daily, "2024-05-01", "2030-01-01");
    let out = stitcher.stitch(&req).await.unwrap();
    assert_eq!(out.range.end(), d(2024, 5, 14));
    assert_eq!(out.series.len(), 14);
}
