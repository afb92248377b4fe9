use chrono::Days;
use proptest::prelude::*;
use trendstitch::{FetchPath, Frequency};

use crate::helpers::*;

proptest! {
    #![proptest_config(ProptestConfig { cases: 24, .. ProptestConfig::default() })]
    #[test]
    fn daily_runs_cover_every_day_once(back in 1u64..1500, span in 0u64..1100) {
        let end = today() - Days::new(back);
        let start = end - Days::new(span);
        let stitcher = mock_stitcher();
        let req = request(
            &["rust", "go"],
            Frequency::Daily,
            &start.to_string(),
            &end.to_string(),
        );

        let out = tokio_test::block_on(async move { stitcher.stitch(&req).await }).unwrap();

        prop_assert_eq!(out.series.len() as u64, span + 1);
        prop_assert_eq!(out.series.first_date(), Some(start));
        prop_assert_eq!(out.series.last_date(), Some(end));
        prop_assert!(out.series.points().windows(2).all(|w| w[0].date < w[1].date));
        prop_assert_eq!(out.path == FetchPath::Stitched, span >= 270);
        prop_assert_eq!(out.anchors.len() + 1, out.segments);
        if out.is_scaled() {
            let max = out.series.max_value().unwrap();
            prop_assert!((max - 100.0).abs() < 1e-9);
            prop_assert!(out.series.points().iter().flat_map(|p| &p.values).all(|v| *v >= 0.0));
        }
    }
}
