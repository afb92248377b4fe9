use chrono::{Datelike, Days, Months, NaiveDate};

use crate::{DateRange, Frequency, NATIVE_WINDOW_ROWS, StitchError};

/// Sunday on or before `d`.
#[must_use]
pub fn week_start(d: NaiveDate) -> NaiveDate {
    d - Days::new(u64::from(d.weekday().num_days_from_sunday()))
}

/// Saturday on or before `d`.
#[must_use]
pub fn saturday_on_or_before(d: NaiveDate) -> NaiveDate {
    d - Days::new(u64::from((d.weekday().num_days_from_sunday() + 1) % 7))
}

/// Saturday on or after `d`.
#[must_use]
pub fn saturday_on_or_after(d: NaiveDate) -> NaiveDate {
    d + Days::new(u64::from(6 - d.weekday().num_days_from_sunday()))
}

/// First day of `d`'s month.
#[must_use]
pub fn month_start(d: NaiveDate) -> NaiveDate {
    d - Days::new(u64::from(d.day0()))
}

/// Last day of `d`'s month.
#[must_use]
pub fn month_end(d: NaiveDate) -> NaiveDate {
    // day 32 of any month lands in the next one
    month_start(month_start(d) + Days::new(31)) - Days::new(1)
}

/// Key of the period containing `d`: the day itself, its week's Sunday, or its month's first day.
#[must_use]
pub fn period_start(d: NaiveDate, frequency: Frequency) -> NaiveDate {
    match frequency {
        Frequency::Daily => d,
        Frequency::Weekly => week_start(d),
        Frequency::Monthly => month_start(d),
    }
}

/// Parse a caller-supplied `YYYY-MM-DD` string.
///
/// `None`, an empty string, and the literal `"None"` all mean "use the default".
///
/// # Errors
/// Returns `InvalidArg` for any other string that is not a valid calendar date, including
/// years outside `1..=9999`.
pub fn parse_date(raw: Option<&str>) -> Result<Option<NaiveDate>, StitchError> {
    let Some(s) = raw.map(str::trim) else {
        return Ok(None);
    };
    if s.is_empty() || s == "None" {
        return Ok(None);
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| {
        StitchError::InvalidArg(format!("invalid date '{s}' (expected YYYY-MM-DD): {e}"))
    })?;
    // keeps the period snapping below well inside chrono's range
    if !(1..=9999).contains(&date.year()) {
        return Err(StitchError::InvalidArg(format!(
            "invalid date '{s}' (expected YYYY-MM-DD): year out of range"
        )));
    }
    Ok(Some(date))
}

/// Whether `[start, end]` is served at `frequency` by a single upstream fetch.
///
/// Daily needs `end - start` under 270 days and weekly under 270 weeks. Monthly has
/// no stitching tier and always fits.
#[must_use]
pub fn fits_single_fetch(start: NaiveDate, end: NaiveDate, frequency: Frequency) -> bool {
    let span = (end - start).num_days();
    match frequency {
        Frequency::Daily => span < NATIVE_WINDOW_ROWS,
        Frequency::Weekly => span < NATIVE_WINDOW_ROWS * 7,
        Frequency::Monthly => true,
    }
}

/// Farthest-back start whose window ending at `end` still returns rows at `frequency`.
///
/// Returns `None` for monthly, which never stitches, and when the subtraction leaves
/// the supported calendar.
#[must_use]
pub fn max_window_start(end: NaiveDate, frequency: Frequency) -> Option<NaiveDate> {
    let back = u64::try_from(NATIVE_WINDOW_ROWS - 1).ok()?;
    match frequency {
        Frequency::Daily => end.checked_sub_days(Days::new(back)),
        Frequency::Weekly => end.checked_sub_days(Days::new(back * 7)),
        Frequency::Monthly => None,
    }
}

/// Date-range rules for one frequency, evaluated against a fixed "today".
///
/// Holding `today` explicitly keeps resolution deterministic; callers pass the wall-clock
/// date in production and a fixed date in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangePolicy {
    frequency: Frequency,
    today: NaiveDate,
}

impl RangePolicy {
    /// Build a policy for `frequency` as of `today`.
    #[must_use]
    pub const fn new(frequency: Frequency, today: NaiveDate) -> Self {
        Self { frequency, today }
    }

    /// Frequency this policy applies to.
    #[must_use]
    pub const fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Latest date upstream data is complete for.
    #[must_use]
    pub fn yesterday(&self) -> NaiveDate {
        self.today - Days::new(1)
    }

    /// Yesterday (daily), the Saturday on or before yesterday (weekly), or the last day
    /// of the previous month (monthly).
    #[must_use]
    pub fn default_end(&self) -> NaiveDate {
        match self.frequency {
            Frequency::Daily => self.yesterday(),
            Frequency::Weekly => saturday_on_or_before(self.yesterday()),
            Frequency::Monthly => month_start(self.today) - Days::new(1),
        }
    }

    /// One year back from `end`: a calendar year (daily), 52 weeks ending on `end`
    /// (weekly, so a Saturday end yields a Sunday start), or the first of the month twelve
    /// months back (monthly).
    #[must_use]
    pub fn default_start(&self, end: NaiveDate) -> NaiveDate {
        let year_back = end.checked_sub_months(Months::new(12)).unwrap_or(end);
        match self.frequency {
            Frequency::Daily => year_back,
            Frequency::Weekly => end - Days::new(52 * 7) + Days::new(1),
            Frequency::Monthly => month_start(year_back),
        }
    }

    /// Snap a raw end date to a period end that is never after yesterday.
    ///
    /// Weekly prefers the Saturday on or after `raw` and falls back to the Saturday on or
    /// before it; monthly prefers the end of `raw`'s month and falls back to the end of
    /// the previous month. If the fallback is still after yesterday the rule is applied
    /// to yesterday instead. Daily clamps to yesterday.
    #[must_use]
    pub fn normalize_end(&self, raw: NaiveDate) -> NaiveDate {
        let yesterday = self.yesterday();
        let snap = |d: NaiveDate| -> NaiveDate {
            match self.frequency {
                Frequency::Daily => d,
                Frequency::Weekly => {
                    let next = saturday_on_or_after(d);
                    if next <= yesterday {
                        next
                    } else {
                        saturday_on_or_before(d)
                    }
                }
                Frequency::Monthly => {
                    let eom = month_end(d);
                    if eom <= yesterday {
                        eom
                    } else {
                        month_start(d) - Days::new(1)
                    }
                }
            }
        };
        let out = snap(raw);
        if out <= yesterday { out } else { snap(yesterday) }
    }

    /// Snap a raw start date to its period start (Sunday or first of month).
    #[must_use]
    pub fn normalize_start(&self, raw: NaiveDate) -> NaiveDate {
        period_start(raw, self.frequency)
    }

    /// Resolve optional raw date strings into an aligned [`DateRange`].
    ///
    /// Defaults are normalized like explicit dates; normalization is idempotent on them.
    ///
    /// # Errors
    /// Returns `InvalidArg` for malformed dates or when the normalized start falls after
    /// the normalized end.
    pub fn resolve(&self, start: Option<&str>, end: Option<&str>) -> Result<DateRange, StitchError> {
        let raw_end = parse_date(end)?.unwrap_or_else(|| self.default_end());
        let end = self.normalize_end(raw_end);
        let raw_start = parse_date(start)?.unwrap_or_else(|| self.default_start(end));
        let start = self.normalize_start(raw_start);
        DateRange::new(start, end, self.frequency)
    }
}
