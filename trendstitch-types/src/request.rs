use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Frequency, StitchError, TermSet};

/// Default region code used when a caller does not supply one.
const DEFAULT_REGION: &str = "US";

/// One stitching run as requested by a caller, before date resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendRequest {
    /// Client identifier recorded on every output row.
    pub client: String,
    /// Terms queried together.
    pub terms: TermSet,
    /// Requested output frequency.
    pub frequency: Frequency,
    /// Raw `YYYY-MM-DD` start; `None` (or the literal `"None"`) selects the default.
    pub start: Option<String>,
    /// Raw `YYYY-MM-DD` end; `None` (or the literal `"None"`) selects the default.
    pub end: Option<String>,
    /// Geographic region code passed through to the connector.
    pub region: String,
}

impl TrendRequest {
    /// Start a request with default dates and region.
    #[must_use]
    pub fn new(client: impl Into<String>, terms: TermSet, frequency: Frequency) -> Self {
        Self {
            client: client.into(),
            terms,
            frequency,
            start: None,
            end: None,
            region: DEFAULT_REGION.to_string(),
        }
    }

    /// Set the raw start date string.
    #[must_use]
    pub fn start(mut self, start: impl Into<String>) -> Self {
        self.start = Some(start.into());
        self
    }

    /// Set the raw end date string.
    #[must_use]
    pub fn end(mut self, end: impl Into<String>) -> Self {
        self.end = Some(end.into());
        self
    }

    /// Set the region code.
    #[must_use]
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Check that the client id can be embedded in an output file name.
    ///
    /// # Errors
    /// Returns `InvalidArg` for an empty id or one containing a path separator or a
    /// control character.
    pub fn validate_client(&self) -> Result<(), StitchError> {
        let c = self.client.trim();
        if c.is_empty() {
            return Err(StitchError::InvalidArg("client id must not be empty".into()));
        }
        if let Some(bad) = c.chars().find(|&ch| matches!(ch, '/' | '\\') || ch.is_control()) {
            return Err(StitchError::InvalidArg(format!(
                "client id '{}' contains forbidden character {bad:?}",
                self.client.escape_debug()
            )));
        }
        Ok(())
    }
}

/// A single upstream fetch: one term set over one inclusive sub-range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentRequest {
    /// Terms to fetch.
    pub terms: TermSet,
    /// Inclusive first day of the window.
    pub start: NaiveDate,
    /// Inclusive last day of the window.
    pub end: NaiveDate,
    /// Geographic region code.
    pub region: String,
}

impl SegmentRequest {
    /// `end - start` in days.
    #[must_use]
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Granularity an upstream source returns for this window.
    #[must_use]
    pub fn native_granularity(&self) -> Frequency {
        Frequency::native_for_span(self.span_days())
    }

    /// Window in the `"YYYY-MM-DD YYYY-MM-DD"` form trends APIs accept.
    #[must_use]
    pub fn timeframe(&self) -> String {
        format!(
            "{} {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}
