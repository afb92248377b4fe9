use chrono::{DateTime, NaiveDate, Utc};
use trendstitch_core::{Frequency, ReportRow, RunContext, Stage, StitchError, TrendRequest};

use crate::StitchOutcome;

/// Annotated long-format table for one run, ready to persist.
///
/// One row per `(term, date)`, grouped by term in query order and by date within a term.
/// Values are rounded half-to-even to integers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendReport {
    rows: Vec<ReportRow>,
    vendor: String,
    client: String,
    frequency: Frequency,
    scaled: bool,
    start: NaiveDate,
    end: NaiveDate,
    generated_at: DateTime<Utc>,
}

#[allow(clippy::cast_possible_truncation)]
fn round_value(v: f64) -> Option<i64> {
    v.is_finite().then(|| v.round_ties_even() as i64)
}

impl TrendReport {
    /// Melt `outcome` into annotated rows.
    ///
    /// # Errors
    /// Returns `Data` (in the annotate stage) if any value is not finite, and `InvalidArg`
    /// (in the annotate stage) if the client id cannot appear in a file name.
    pub fn from_outcome(
        outcome: &StitchOutcome,
        req: &TrendRequest,
        generated_at: DateTime<Utc>,
    ) -> Result<Self, StitchError> {
        let ctx = RunContext {
            frequency: req.frequency,
            start: Some(outcome.range.start()),
            end: Some(outcome.range.end()),
            terms: req.terms.as_slice().to_vec(),
        };
        req.validate_client()
            .map_err(|e| e.in_stage(Stage::Annotate, &ctx))?;
        let scaled = outcome.is_scaled();
        let queried = req.terms.to_string();
        let series = &outcome.series;

        let mut rows = Vec::with_capacity(series.len() * series.terms().len());
        for (col, term) in series.terms().iter().enumerate() {
            for p in series.points() {
                let Some(value) = round_value(p.values[col]) else {
                    return Err(StitchError::Data(format!(
                        "non-finite value for '{term}' on {}",
                        p.date
                    ))
                    .in_stage(Stage::Annotate, &ctx));
                };
                rows.push(ReportRow {
                    date: p.date,
                    keyword: term.clone(),
                    value,
                    client: req.client.clone(),
                    region: req.region.clone(),
                    scaled,
                    start_date: outcome.range.start(),
                    input_start_date: req.start.clone(),
                    end_date: outcome.range.end(),
                    input_end_date: req.end.clone(),
                    pull_timestamp: generated_at,
                    keywords_queried: queried.clone(),
                });
            }
        }

        Ok(Self {
            rows,
            vendor: outcome.vendor.to_string(),
            client: req.client.clone(),
            frequency: req.frequency,
            scaled,
            start: outcome.range.start(),
            end: outcome.range.end(),
            generated_at,
        })
    }

    /// Annotated rows in persistence order.
    #[must_use]
    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    /// Whether the rows come from a stitched, normalized series.
    #[must_use]
    pub const fn scaled(&self) -> bool {
        self.scaled
    }

    /// File name for this report:
    /// `{generated:%Y%m%d_%H%M%S}_{vendor}_{client}_{frequency}_{scaled|raw}_{start:%m%d%y}_{end:%m%d%y}.csv`.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!(
            "{}_{}_{}_{}_{}_{}_{}.csv",
            self.generated_at.format("%Y%m%d_%H%M%S"),
            self.vendor,
            self.client,
            self.frequency,
            if self.scaled { "scaled" } else { "raw" },
            self.start.format("%m%d%y"),
            self.end.format("%m%d%y"),
        )
    }
}
