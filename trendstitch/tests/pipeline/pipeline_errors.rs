use std::sync::Arc;
use std::time::Duration;

use trendstitch::{Frequency, Point, Series, Stage, Stitcher, StitchError};
use trendstitch_mock::{DynamicMockConnector, MockBehavior, MockConnector};

use crate::helpers::*;

#[tokio::test]
async fn all_zero_overlap_is_degenerate() {
    let stitcher = mock_stitcher();
    let req = request(&["rust", "ZERO"], Frequency::Daily, "2023-04-10", "2024-05-14");
    let err = stitcher.stitch(&req).await.unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Scale));
    assert!(err.is_degenerate_data());
    match err.root() {
        StitchError::DegenerateScale {
            term, denominator, ..
        } => {
            assert_eq!(term, "ZERO");
            assert_eq!(*denominator, 0.0);
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn failing_fetch_aborts_with_context() {
    let stitcher = mock_stitcher();
    let req = request(&["FAIL"], Frequency::Daily, "2024-01-01", "2024-03-01");
    let err = stitcher.stitch(&req).await.unwrap_err();
    assert!(err.is_fetch_error());
    assert_eq!(err.stage(), Some(Stage::Fetch));
    let StitchError::Failed { context, .. } = &err else {
        panic!("expected a terminal failure, got {err:?}");
    };
    assert_eq!(context.start, Some(d(2024, 1, 1)));
    assert_eq!(context.end, Some(d(2024, 3, 1)));
    assert_eq!(context.terms, vec!["FAIL".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn slow_segment_hits_provider_timeout() {
    let stitcher = Stitcher::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .today(today())
        .provider_timeout(Duration::from_millis(50))
        .build()
        .unwrap();
    let req = request(&["TIMEOUT"], Frequency::Daily, "2024-01-01", "2024-03-01");
    let err = stitcher.stitch(&req).await.unwrap_err();
    assert!(matches!(
        err.root(),
        StitchError::ProviderTimeout { capability, .. } if capability == "interest"
    ));
}

#[tokio::test(start_paused = true)]
async fn request_deadline_bounds_the_whole_run() {
    let (c, ctrl) = DynamicMockConnector::new_with_controller("dyn");
    ctrl.push_interest_behavior(MockBehavior::Hang).await;
    let stitcher = Stitcher::builder()
        .with_connector(c)
        .today(today())
        .provider_timeout(Duration::from_secs(60))
        .request_timeout(Duration::from_millis(100))
        .build()
        .unwrap();
    let req = request(&["rust"], Frequency::Daily, "2024-01-01", "2024-03-01");
    let err = stitcher.stitch(&req).await.unwrap_err();
    assert_eq!(err.root(), &StitchError::request_timeout("stitch"));
}

#[tokio::test]
async fn malformed_dates_fail_before_any_fetch() {
    let (stitcher, ctrl) = emulating_stitcher().await;
    let req = request(&["rust"], Frequency::Daily, "2024/01/01", "2024-03-01");
    let err = stitcher.stitch(&req).await.unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Resolve));
    assert!(matches!(err.root(), StitchError::InvalidArg(_)));

    let inverted = request(&["rust"], Frequency::Daily, "2024-03-02", "2024-03-01");
    let err = stitcher.stitch(&inverted).await.unwrap_err();
    assert!(matches!(err.root(), StitchError::InvalidArg(_)));
    assert!(ctrl.get_interest_requests().await.is_empty());
}

#[tokio::test]
async fn out_of_range_years_fail_before_any_fetch() {
    let (stitcher, ctrl) = emulating_stitcher().await;
    for freq in [Frequency::Daily, Frequency::Weekly, Frequency::Monthly] {
        let req = request(&["rust"], freq, "-262143-01-01", "2024-03-01");
        let err = stitcher.stitch(&req).await.unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Resolve));
        assert!(matches!(err.root(), StitchError::InvalidArg(_)));
    }
    assert!(ctrl.get_interest_requests().await.is_empty());
}

#[tokio::test]
async fn client_with_path_separator_fails_before_any_fetch() {
    let (stitcher, ctrl) = emulating_stitcher().await;
    let mut req = request(&["rust"], Frequency::Daily, "2024-01-01", "2024-03-01");
    req.client = "../../tmp/evil".into();
    let err = stitcher.stitch(&req).await.unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Resolve));
    assert!(matches!(err.root(), StitchError::InvalidArg(_)));
    assert!(ctrl.get_interest_requests().await.is_empty());
}

#[tokio::test]
async fn empty_or_mismatched_responses_are_data_errors() {
    let (c, ctrl) = DynamicMockConnector::new_with_controller("dyn");
    let stitcher = stitcher_with(c);
    let req = request(&["rust"], Frequency::Daily, "2024-01-01", "2024-03-01");

    ctrl.push_interest_behavior(MockBehavior::Return(Series::empty(vec!["rust".into()])))
        .await;
    let err = stitcher.stitch(&req).await.unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Fetch));
    assert!(matches!(err.root(), StitchError::Data(_)));

    let wrong = Series::new(
        vec!["go".into()],
        vec![Point::new(d(2024, 1, 1), vec![1.0])],
    )
    .unwrap();
    ctrl.push_interest_behavior(MockBehavior::Return(wrong)).await;
    let err = stitcher.stitch(&req).await.unwrap_err();
    assert!(matches!(err.root(), StitchError::Data(_)));
}

#[tokio::test]
async fn segment_budget_is_enforced() {
    let (c, ctrl) = DynamicMockConnector::new_with_controller("dyn");
    ctrl.set_emulate_when_idle(true).await;
    let stitcher = Stitcher::builder()
        .with_connector(c)
        .today(today())
        .max_segments(2)
        .build()
        .unwrap();
    let req = request(&["rust"], Frequency::Daily, "2021-06-01", "2024-05-14");
    let err = stitcher.stitch(&req).await.unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Segment));
    assert!(matches!(err.root(), StitchError::Data(_)));
    assert_eq!(ctrl.get_interest_requests().await.len(), 1);
}
