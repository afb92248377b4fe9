// Shared fixtures so tests can `use crate::helpers::*;`
#![allow(dead_code)]
use std::time::Duration;

use chrono::NaiveDate;
use trendstitch_core::{BackoffConfig, SegmentRequest, TermSet};
use trendstitch_http::{HttpConfig, PollConfig, RetryConfig};

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).expect("valid date")
}

pub fn segment(terms: &[&str], start: NaiveDate, end: NaiveDate) -> SegmentRequest {
    SegmentRequest {
        terms: TermSet::new(terms.iter().copied()).expect("valid terms"),
        start,
        end,
        region: "US".into(),
    }
}

/// Fast retries and polling so tests against a local server finish quickly.
pub fn fast_config(base_url: &str, max_retries: u32) -> HttpConfig {
    HttpConfig::new(base_url.parse().expect("valid base url"))
        .with_retry(RetryConfig {
            max_retries,
            backoff: BackoffConfig {
                min_backoff_ms: 1,
                max_backoff_ms: 5,
                factor: 2,
                jitter_percent: 0,
            },
        })
        .with_poll(PollConfig {
            interval: Duration::from_millis(10),
            max_wait: Duration::from_secs(5),
        })
        .with_timeout(Duration::from_secs(5))
}
