// Shared fixtures so tests can `use crate::helpers::*;`
use std::sync::Arc;

use chrono::NaiveDate;
use trendstitch::{Frequency, Stitcher, TermSet, TrendRequest, TrendsConnector};
use trendstitch_mock::curve::period_mean;
use trendstitch_mock::{DynamicMockConnector, DynamicMockController, MockConnector};

/// Fixed "today" every pipeline test runs against. Yesterday is 2024-05-14.
pub const TODAY: (i32, u32, u32) = (2024, 5, 15);

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).expect("valid date")
}

pub fn today() -> NaiveDate {
    d(TODAY.0, TODAY.1, TODAY.2)
}

pub fn stitcher_with(c: Arc<dyn TrendsConnector>) -> Stitcher {
    Stitcher::builder()
        .with_connector(c)
        .today(today())
        .build()
        .expect("stitcher builds")
}

pub fn mock_stitcher() -> Stitcher {
    stitcher_with(Arc::new(MockConnector::new()))
}

/// Dynamic mock that emulates the vendor unless a behavior is scripted.
pub async fn emulating_stitcher() -> (Stitcher, DynamicMockController) {
    let (c, ctrl) = DynamicMockConnector::new_with_controller("dyn");
    ctrl.set_emulate_when_idle(true).await;
    (stitcher_with(c), ctrl)
}

pub fn request(terms: &[&str], frequency: Frequency, start: &str, end: &str) -> TrendRequest {
    TrendRequest::new(
        "acme",
        TermSet::new(terms.iter().copied()).expect("valid terms"),
        frequency,
    )
    .start(start)
    .end(end)
}

/// Largest absolute gap between `got` (normalized to 100) and the true curve averaged
/// over each row's period and normalized the same way.
#[allow(dead_code)]
pub fn max_error_vs_truth(got: &trendstitch::Series, frequency: Frequency) -> f64 {
    let truth: Vec<Vec<f64>> = got
        .points()
        .iter()
        .map(|p| {
            got.terms()
                .iter()
                .map(|t| period_mean(t, p.date, frequency))
                .collect()
        })
        .collect();
    let max = truth.iter().flatten().copied().fold(0.0_f64, f64::max);
    got.points()
        .iter()
        .zip(&truth)
        .flat_map(|(p, t)| p.values.iter().zip(t).map(|(g, t)| (g - t / max * 100.0).abs()))
        .fold(0.0_f64, f64::max)
}
