use trendstitch_core::{
    DateRange, FetchPath, RunContext, SegmentRequest, Stage, StitchError, TrendRequest, aggregate,
    normalize, stitch,
};

use super::StitchOutcome;
use super::plan::plan;
use crate::Stitcher;

impl Stitcher {
    /// Produce one consistently scaled series for `req`.
    ///
    /// Resolves the requested dates, picks a path from frequency and span, then fetches
    /// directly, fetches and averages, or walks the range in overlapping segments,
    /// rescales them against each other and normalizes the result to a maximum of 100.
    ///
    /// Behavior:
    /// - Every failure is terminal and returned as `StitchError::Failed`, carrying the
    ///   stage and the resolved range, frequency and terms. No partial series is returned.
    /// - Fetches never retry here; retry policy belongs to the connector.
    /// - With a request timeout configured, the whole run is bounded by it and fails with
    ///   `RequestTimeout { capability: "stitch" }`.
    ///
    /// # Errors
    /// See [`StitchError`]; [`StitchError::root`] exposes the underlying cause.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "trendstitch::stitch",
            skip(self, req),
            fields(
                client = %req.client,
                frequency = %req.frequency,
                terms = %req.terms,
                region = %req.region,
            ),
        )
    )]
    pub async fn stitch(&self, req: &TrendRequest) -> Result<StitchOutcome, StitchError> {
        let mut ctx = RunContext {
            frequency: req.frequency,
            start: None,
            end: None,
            terms: req.terms.as_slice().to_vec(),
        };
        let range = self
            .resolve(req)
            .map_err(|e| e.in_stage(Stage::Resolve, &ctx))?;
        ctx.start = Some(range.start());
        ctx.end = Some(range.end());

        let run = self.run(req, range, &ctx);
        if let Some(deadline) = self.cfg.request_timeout {
            (tokio::time::timeout(deadline, run).await).map_or_else(
                |_| Err(StitchError::request_timeout("stitch").in_stage(Stage::Fetch, &ctx)),
                |res| res,
            )
        } else {
            run.await
        }
    }

    async fn run(
        &self,
        req: &TrendRequest,
        range: DateRange,
        ctx: &RunContext,
    ) -> Result<StitchOutcome, StitchError> {
        let path = plan(&range);
        #[cfg(feature = "tracing")]
        tracing::info!(
            start = %range.start(),
            end = %range.end(),
            path = ?path,
            "resolved run"
        );

        let vendor = self.vendor();
        match path {
            FetchPath::Direct | FetchPath::DirectAggregated => {
                let raw = self
                    .fetch_segment(SegmentRequest {
                        terms: req.terms.clone(),
                        start: range.start(),
                        end: range.end(),
                        region: req.region.clone(),
                    })
                    .await
                    .map_err(|e| e.in_stage(Stage::Fetch, ctx))?;
                let series = if path == FetchPath::DirectAggregated {
                    aggregate(&raw, range.frequency())
                        .map_err(|e| e.in_stage(Stage::Aggregate, ctx))?
                } else {
                    raw
                };
                Ok(StitchOutcome {
                    series,
                    path,
                    range,
                    segments: 1,
                    anchors: Vec::new(),
                    factors: Vec::new(),
                    tail_aggregated: false,
                    vendor,
                })
            }
            FetchPath::Stitched => {
                let segs = self
                    .collect_segments(&req.terms, &req.region, &range, ctx)
                    .await?;
                let segments = segs.newest_first.len();
                let (merged, factors) = stitch(segs.newest_first, &segs.anchors)
                    .map_err(|e| e.in_stage(Stage::Scale, ctx))?;
                let series = normalize(merged).map_err(|e| e.in_stage(Stage::Normalize, ctx))?;
                #[cfg(feature = "tracing")]
                tracing::info!(segments, rows = series.len(), "stitched series");
                Ok(StitchOutcome {
                    series,
                    path,
                    range,
                    segments,
                    anchors: segs.anchors,
                    factors,
                    tail_aggregated: segs.tail_aggregated,
                    vendor,
                })
            }
        }
    }
}
