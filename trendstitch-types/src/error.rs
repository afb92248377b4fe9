use core::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Frequency;

/// Pipeline stage in which a run failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Stage {
    /// Resolving the requested date range and term set.
    Resolve,
    /// Fetching a segment from the connector.
    Fetch,
    /// Walking the range backwards and computing overlap anchors.
    Segment,
    /// Averaging a fine-grained series into period buckets.
    Aggregate,
    /// Rescaling adjacent segments against each other.
    Scale,
    /// Rescaling the stitched series to a maximum of 100.
    Normalize,
    /// Building the annotated output table.
    Annotate,
}

impl Stage {
    /// Lowercase label used in messages and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Resolve => "resolve",
            Self::Fetch => "fetch",
            Self::Segment => "segment",
            Self::Aggregate => "aggregate",
            Self::Scale => "scale",
            Self::Normalize => "normalize",
            Self::Annotate => "annotate",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a failing run was asked to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunContext {
    /// Requested output frequency.
    pub frequency: Frequency,
    /// Resolved start date, if resolution got that far.
    pub start: Option<NaiveDate>,
    /// Resolved end date, if resolution got that far.
    pub end: Option<NaiveDate>,
    /// Terms queried in this run.
    pub terms: Vec<String>,
}

impl fmt::Display for RunContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frequency={}", self.frequency)?;
        match (self.start, self.end) {
            (Some(s), Some(e)) => write!(f, " range={s}..={e}")?,
            _ => f.write_str(" range=unresolved")?,
        }
        write!(f, " terms=[{}]", self.terms.join(", "))
    }
}

/// Unified error type for the trendstitch workspace.
///
/// Covers input validation, connector failures, degenerate stitching data and
/// normalization failures. A run reports exactly one terminal error, wrapped in
/// [`StitchError::Failed`] with the stage and run context attached.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq)]
#[non_exhaustive]
pub enum StitchError {
    /// Invalid input argument (malformed date, empty term set, start after end).
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// Issues with returned or expected data (empty response, mismatched terms, broken invariants).
    #[error("data issue: {0}")]
    Data(String),

    /// The requested capability is not implemented by the target connector.
    #[error("unsupported capability: {capability}")]
    Unsupported {
        /// Capability label, e.g. "interest".
        capability: String,
    },

    /// An individual connector returned an error.
    #[error("{connector} failed: {msg}")]
    Connector {
        /// Connector name that failed.
        connector: String,
        /// Human-readable error message.
        msg: String,
    },

    /// An individual connector call exceeded the configured timeout.
    #[error("provider timed out: {capability} via {connector}")]
    ProviderTimeout {
        /// Connector name that timed out.
        connector: String,
        /// Capability label (e.g. "interest", "report").
        capability: String,
    },

    /// The overall request exceeded the configured deadline.
    #[error("request timed out: {capability}")]
    RequestTimeout {
        /// Capability label for which the request timed out.
        capability: String,
    },

    /// The caller cancelled an in-flight operation.
    #[error("cancelled: {capability}")]
    Cancelled {
        /// Capability label that was cancelled.
        capability: String,
    },

    /// A scale factor computed from an overlap window was zero or not finite.
    #[error(
        "degenerate scale factor for '{term}' at anchor {anchor}: {numerator} / {denominator}"
    )]
    DegenerateScale {
        /// Term whose overlap sums produced the factor.
        term: String,
        /// Overlap anchor used for the pair.
        anchor: NaiveDate,
        /// Sum of the newer segment over the overlap window.
        numerator: f64,
        /// Sum of the older segment over the overlap window.
        denominator: f64,
    },

    /// The stitched series has no positive finite maximum to normalize against.
    #[error("cannot normalize series with maximum {max}")]
    Normalization {
        /// Observed global maximum.
        max: f64,
    },

    /// Terminal failure of a run, tagged with the stage and what was requested.
    #[error("{stage} stage failed ({context}): {source}")]
    Failed {
        /// Stage that produced the error.
        stage: Stage,
        /// Requested range, frequency and terms.
        context: Box<RunContext>,
        /// Underlying cause.
        #[source]
        source: Box<StitchError>,
    },
}

impl StitchError {
    /// Helper: build a `Connector` error with the connector name and message.
    pub fn connector(connector: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Connector {
            connector: connector.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build an `Unsupported` error for a capability string.
    #[must_use]
    pub fn unsupported(cap: impl Into<String>) -> Self {
        Self::Unsupported {
            capability: cap.into(),
        }
    }

    /// Helper: build a `ProviderTimeout` error.
    pub fn provider_timeout(connector: impl Into<String>, capability: impl Into<String>) -> Self {
        Self::ProviderTimeout {
            connector: connector.into(),
            capability: capability.into(),
        }
    }

    /// Helper: build a `RequestTimeout` error.
    #[must_use]
    pub fn request_timeout(capability: impl Into<String>) -> Self {
        Self::RequestTimeout {
            capability: capability.into(),
        }
    }

    /// Helper: build a `Cancelled` error.
    #[must_use]
    pub fn cancelled(capability: impl Into<String>) -> Self {
        Self::Cancelled {
            capability: capability.into(),
        }
    }

    /// Attach a stage and run context. Errors that already carry one are returned unchanged
    /// so the innermost stage wins.
    #[must_use]
    pub fn in_stage(self, stage: Stage, context: &RunContext) -> Self {
        match self {
            e @ Self::Failed { .. } => e,
            other => Self::Failed {
                stage,
                context: Box::new(context.clone()),
                source: Box::new(other),
            },
        }
    }

    /// The innermost error, looking through any `Failed` wrapper.
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::Failed { source, .. } => source.root(),
            other => other,
        }
    }

    /// The stage a terminal failure was attributed to, if any.
    #[must_use]
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Failed { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Returns true when the failure came from the upstream fetch path
    /// (connector errors, timeouts, cancellation, malformed responses).
    #[must_use]
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self.root(),
            Self::Connector { .. }
                | Self::ProviderTimeout { .. }
                | Self::RequestTimeout { .. }
                | Self::Cancelled { .. }
                | Self::Unsupported { .. }
        ) || matches!(self, Self::Failed { stage: Stage::Fetch, .. })
    }

    /// Returns true when the data itself cannot produce a trustworthy stitched series.
    #[must_use]
    pub fn is_degenerate_data(&self) -> bool {
        matches!(
            self.root(),
            Self::DegenerateScale { .. } | Self::Normalization { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> RunContext {
        RunContext {
            frequency: Frequency::Daily,
            start: NaiveDate::from_ymd_opt(2024, 1, 1),
            end: NaiveDate::from_ymd_opt(2024, 12, 31),
            terms: vec!["rust".into(), "go".into()],
        }
    }

    #[test]
    fn in_stage_keeps_innermost_stage() {
        let e = StitchError::Data("x".into())
            .in_stage(Stage::Scale, &ctx())
            .in_stage(Stage::Normalize, &ctx());
        assert_eq!(e.stage(), Some(Stage::Scale));
        assert_eq!(e.root(), &StitchError::Data("x".into()));
    }

    #[test]
    fn failed_display_carries_context() {
        let e = StitchError::Normalization { max: 0.0 }.in_stage(Stage::Normalize, &ctx());
        let msg = e.to_string();
        assert!(msg.contains("normalize stage failed"));
        assert!(msg.contains("range=2024-01-01..=2024-12-31"));
        assert!(msg.contains("terms=[rust, go]"));
        assert!(e.is_degenerate_data());
        assert!(!e.is_fetch_error());
    }

    #[test]
    fn fetch_classification_looks_through_wrapper() {
        let e = StitchError::connector("mock", "boom").in_stage(Stage::Fetch, &ctx());
        assert!(e.is_fetch_error());
        let t = StitchError::provider_timeout("mock", "interest");
        assert!(t.is_fetch_error());
    }
}
