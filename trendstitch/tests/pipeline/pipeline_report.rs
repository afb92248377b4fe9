use chrono::{TimeZone, Utc};
use trendstitch::{Frequency, Stage, StitchError, TrendReport};

use crate::helpers::*;

#[tokio::test]
async fn direct_report_is_term_major_and_unscaled() {
    let stitcher = mock_stitcher();
    let req = request(&["rust", "go"], Frequency::Daily, "2024-01-01", "2024-03-01");
    let out = stitcher.stitch(&req).await.unwrap();
    let at = Utc.with_ymd_and_hms(2024, 5, 15, 9, 30, 5).unwrap();
    let report = TrendReport::from_outcome(&out, &req, at).unwrap();

    let rows = report.rows();
    // 31 days of January, 29 of February, 1 of March
    assert_eq!(rows.len(), 2 * 61);
    assert!(rows[..61].iter().all(|r| r.keyword == "rust"));
    assert!(rows[61..].iter().all(|r| r.keyword == "go"));
    assert_eq!(rows[0].date, d(2024, 1, 1));
    assert_eq!(rows[60].date, d(2024, 3, 1));
    assert_eq!(rows[61].date, d(2024, 1, 1));

    let r = &rows[0];
    assert_eq!(r.client, "acme");
    assert_eq!(r.region, "US");
    assert!(!r.scaled);
    assert_eq!(r.start_date, d(2024, 1, 1));
    assert_eq!(r.end_date, d(2024, 3, 1));
    assert_eq!(r.input_start_date.as_deref(), Some("2024-01-01"));
    assert_eq!(r.input_end_date.as_deref(), Some("2024-03-01"));
    assert_eq!(r.pull_timestamp, at);
    assert_eq!(r.keywords_queried, "['rust', 'go']");
    assert!(rows.iter().all(|r| (0..=100).contains(&r.value)));
    assert!(rows.iter().any(|r| r.value == 100));

    assert!(!report.scaled());
    assert_eq!(
        report.file_name(),
        "20240515_093005_Mock_acme_daily_raw_010124_030124.csv"
    );
}

#[tokio::test]
async fn stitched_report_is_flagged_scaled() {
    let stitcher = mock_stitcher();
    let req = request(&["rust"], Frequency::Daily, "2023-04-10", "2024-05-14");
    let out = stitcher.stitch(&req).await.unwrap();
    let at = Utc.with_ymd_and_hms(2024, 5, 15, 0, 0, 0).unwrap();
    let report = TrendReport::from_outcome(&out, &req, at).unwrap();

    assert!(report.scaled());
    assert_eq!(report.rows().len(), out.series.len());
    assert!(report.rows().iter().all(|r| r.scaled));
    assert_eq!(report.rows().iter().map(|r| r.value).max(), Some(100));
    assert_eq!(
        report.file_name(),
        "20240515_000000_Mock_acme_daily_scaled_041023_051424.csv"
    );
}

#[tokio::test]
async fn defaulted_dates_leave_inputs_empty() {
    let stitcher = mock_stitcher();
    let req = trendstitch::TrendRequest::new(
        "acme",
        trendstitch::TermSet::new(["rust"]).unwrap(),
        Frequency::Monthly,
    )
    .region("GB");
    let out = stitcher.stitch(&req).await.unwrap();
    let report = TrendReport::from_outcome(&out, &req, Utc::now()).unwrap();
    let r = &report.rows()[0];
    assert!(r.input_start_date.is_none());
    assert!(r.input_end_date.is_none());
    assert_eq!(r.region, "GB");
    assert_eq!(r.end_date, d(2024, 4, 30));
    assert_eq!(r.keywords_queried, "['rust']");
}

#[tokio::test]
async fn report_refuses_client_that_escapes_the_output_dir() {
    let stitcher = mock_stitcher();
    let req = request(&["rust"], Frequency::Daily, "2024-01-01", "2024-03-01");
    let out = stitcher.stitch(&req).await.unwrap();

    let mut evil = req.clone();
    evil.client = "../../tmp/evil".into();
    let at = Utc.with_ymd_and_hms(2024, 5, 15, 0, 0, 0).unwrap();
    let err = TrendReport::from_outcome(&out, &evil, at).unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Annotate));
    assert!(matches!(err.root(), StitchError::InvalidArg(_)));
}
