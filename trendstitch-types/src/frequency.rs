use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::StitchError;

/// Longest span, in native rows, an upstream fetch returns at a given granularity.
///
/// A span of `end - start` strictly below this many days is served daily, strictly below
/// this many weeks is served weekly, anything longer monthly.
pub const NATIVE_WINDOW_ROWS: i64 = 270;

/// Row spacing of a series, either requested by a caller or returned natively by a vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// One row per calendar day.
    Daily,
    /// One row per week, keyed by the week's Sunday.
    Weekly,
    /// One row per month, keyed by the first day of the month.
    Monthly,
}

impl Frequency {
    /// Lowercase label used in file names and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    /// Granularity an upstream trends source returns for a span of `end - start` days.
    #[must_use]
    pub const fn native_for_span(span_days: i64) -> Self {
        if span_days < NATIVE_WINDOW_ROWS {
            Self::Daily
        } else if span_days < NATIVE_WINDOW_ROWS * 7 {
            Self::Weekly
        } else {
            Self::Monthly
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = StitchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "d" => Ok(Self::Daily),
            "weekly" | "w" => Ok(Self::Weekly),
            "monthly" | "m" => Ok(Self::Monthly),
            other => Err(StitchError::InvalidArg(format!(
                "unknown frequency '{other}' (expected daily, weekly or monthly)"
            ))),
        }
    }
}
