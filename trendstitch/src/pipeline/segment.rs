use chrono::NaiveDate;
use trendstitch_core::range::{fits_single_fetch, max_window_start};
use trendstitch_core::{
    DateRange, Frequency, RunContext, SegmentRequest, Series, Stage, StitchError, TermSet,
    aggregate, overlap_anchor,
};

use crate::Stitcher;

/// Raw segments of one stitched run, newest first.
pub(crate) struct Segments {
    pub(crate) newest_first: Vec<Series>,
    /// `anchors[i]` bounds the overlap of `newest_first[i]` and `newest_first[i + 1]`.
    pub(crate) anchors: Vec<NaiveDate>,
    pub(crate) tail_aggregated: bool,
}

impl Stitcher {
    /// Walk `range` backwards in full-granularity windows until the remainder fits one fetch.
    ///
    /// Each window ends at the previous window's overlap anchor, so fetches are strictly
    /// sequential. The final tail covers `[range.start, last anchor]`; for weekly runs a
    /// tail short enough to come back daily is averaged into weeks first.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "trendstitch::pipeline::segments",
            skip(self, terms, ctx),
            fields(start = %range.start(), end = %range.end(), frequency = %range.frequency()),
        )
    )]
    pub(crate) async fn collect_segments(
        &self,
        terms: &TermSet,
        region: &str,
        range: &DateRange,
        ctx: &RunContext,
    ) -> Result<Segments, StitchError> {
        let frequency = range.frequency();
        let request = |start: NaiveDate, end: NaiveDate| SegmentRequest {
            terms: terms.clone(),
            start,
            end,
            region: region.to_string(),
        };

        let mut newest_first: Vec<Series> = Vec::new();
        let mut anchors: Vec<NaiveDate> = Vec::new();
        let mut current_end = range.end();

        while !fits_single_fetch(range.start(), current_end, frequency) {
            // this window plus the tail
            if newest_first.len() + 2 > self.cfg.max_segments {
                return Err(StitchError::Data(format!(
                    "range needs more than {} segments",
                    self.cfg.max_segments
                ))
                .in_stage(Stage::Segment, ctx));
            }
            let Some(window_start) = max_window_start(current_end, frequency) else {
                return Err(StitchError::Data(format!(
                    "no {frequency} window ends at {current_end}"
                ))
                .in_stage(Stage::Segment, ctx));
            };
            let seg = self
                .fetch_segment(request(window_start, current_end))
                .await
                .map_err(|e| e.in_stage(Stage::Fetch, ctx))?;
            let anchor = overlap_anchor(&seg).map_err(|e| e.in_stage(Stage::Segment, ctx))?;
            #[cfg(feature = "tracing")]
            tracing::debug!(
                window_start = %window_start,
                window_end = %current_end,
                anchor = %anchor,
                "segment anchored"
            );
            newest_first.push(seg);
            anchors.push(anchor);
            current_end = anchor;
        }

        let tail_req = request(range.start(), current_end);
        let tail_native = tail_req.native_granularity();
        let mut tail = self
            .fetch_segment(tail_req)
            .await
            .map_err(|e| e.in_stage(Stage::Fetch, ctx))?;
        let tail_aggregated = frequency == Frequency::Weekly && tail_native == Frequency::Daily;
        if tail_aggregated {
            tail = aggregate(&tail, Frequency::Weekly)
                .map_err(|e| e.in_stage(Stage::Aggregate, ctx))?;
        }
        newest_first.push(tail);

        Ok(Segments {
            newest_first,
            anchors,
            tail_aggregated,
        })
    }
}
