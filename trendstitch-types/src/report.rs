use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One row of the annotated long-format output table: a single `(date, keyword)` value
/// plus the run metadata repeated on every row.
///
/// Field order is the column order of persisted files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    /// Row date (day, week start or month start).
    pub date: NaiveDate,
    /// Term this value belongs to.
    pub keyword: String,
    /// Interest value rounded half-to-even.
    pub value: i64,
    /// Client identifier.
    pub client: String,
    /// Region code queried.
    pub region: String,
    /// True when the series was stitched across segments and normalized.
    pub scaled: bool,
    /// Resolved start of the requested range.
    pub start_date: NaiveDate,
    /// Start date as supplied by the caller, if any.
    pub input_start_date: Option<String>,
    /// Resolved end of the requested range.
    pub end_date: NaiveDate,
    /// End date as supplied by the caller, if any.
    pub input_end_date: Option<String>,
    /// When the data was pulled, persisted as `YYYY-MM-DD HH:MM:SS` (UTC).
    #[serde(with = "pull_timestamp_format")]
    pub pull_timestamp: DateTime<Utc>,
    /// Full term list of the run, rendered as `['a', 'b']`.
    pub keywords_queried: String,
}

mod pull_timestamp_format {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&at.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(D::Error::custom)
    }
}
