use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::{Frequency, StitchError};

/// Inclusive date range requested for one run, aligned to its frequency.
///
/// Invariants enforced by [`DateRange::new`]:
/// - `start <= end`
/// - weekly: `start` is a Sunday and `end` is a Saturday
/// - monthly: `start` is the first and `end` the last day of a month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
    frequency: Frequency,
}

impl DateRange {
    /// Validate and build a range.
    ///
    /// # Errors
    /// Returns `InvalidArg` when `start > end` or when the bounds are not aligned to
    /// the frequency's period boundaries.
    pub fn new(start: NaiveDate, end: NaiveDate, frequency: Frequency) -> Result<Self, StitchError> {
        if start > end {
            return Err(StitchError::InvalidArg(format!(
                "start date {start} is after end date {end}"
            )));
        }
        match frequency {
            Frequency::Daily => {}
            Frequency::Weekly => {
                if start.weekday() != Weekday::Sun {
                    return Err(StitchError::InvalidArg(format!(
                        "weekly range must start on a Sunday, got {start} ({})",
                        start.weekday()
                    )));
                }
                if end.weekday() != Weekday::Sat {
                    return Err(StitchError::InvalidArg(format!(
                        "weekly range must end on a Saturday, got {end} ({})",
                        end.weekday()
                    )));
                }
            }
            Frequency::Monthly => {
                if start.day() != 1 {
                    return Err(StitchError::InvalidArg(format!(
                        "monthly range must start on the first of a month, got {start}"
                    )));
                }
                if end.succ_opt().is_some_and(|next| next.day() != 1) {
                    return Err(StitchError::InvalidArg(format!(
                        "monthly range must end on the last day of a month, got {end}"
                    )));
                }
            }
        }
        Ok(Self {
            start,
            end,
            frequency,
        })
    }

    /// Inclusive first day.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Inclusive last day.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Requested output frequency.
    #[must_use]
    pub const fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// `end - start` in whole days.
    #[must_use]
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Number of calendar days covered, bounds included.
    #[must_use]
    pub fn calendar_days(&self) -> i64 {
        self.span_days() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn rejects_inverted_bounds() {
        let err = DateRange::new(d(2024, 2, 1), d(2024, 1, 1), Frequency::Daily).unwrap_err();
        assert!(matches!(err, StitchError::InvalidArg(_)));
    }

    #[test]
    fn weekly_bounds_must_be_sunday_to_saturday() {
        assert!(DateRange::new(d(2024, 1, 7), d(2024, 3, 30), Frequency::Weekly).is_ok());
        assert!(DateRange::new(d(2024, 1, 8), d(2024, 3, 30), Frequency::Weekly).is_err());
        assert!(DateRange::new(d(2024, 1, 7), d(2024, 3, 31), Frequency::Weekly).is_err());
    }

    #[test]
    fn monthly_bounds_must_be_whole_months() {
        assert!(DateRange::new(d(2023, 2, 1), d(2024, 2, 29), Frequency::Monthly).is_ok());
        assert!(DateRange::new(d(2023, 2, 2), d(2024, 2, 29), Frequency::Monthly).is_err());
        assert!(DateRange::new(d(2023, 2, 1), d(2024, 2, 28), Frequency::Monthly).is_err());
    }

    #[test]
    fn span_and_calendar_days() {
        let r = DateRange::new(d(2024, 1, 1), d(2024, 1, 31), Frequency::Daily).unwrap();
        assert_eq!(r.span_days(), 30);
        assert_eq!(r.calendar_days(), 31);
    }
}
