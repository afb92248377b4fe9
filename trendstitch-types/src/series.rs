use core::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::StitchError;

/// Ordered, de-duplicated set of search terms queried together in one run.
///
/// Terms are trimmed on construction; empty terms and duplicates are rejected so the
/// column layout of every segment in a run is identical.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct TermSet(Vec<String>);

impl TermSet {
    /// Build a term set, preserving caller order.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the set is empty, a term is blank, or a term repeats.
    pub fn new<I, S>(terms: I) -> Result<Self, StitchError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for t in terms {
            let t = t.as_ref().trim();
            if t.is_empty() {
                return Err(StitchError::InvalidArg("search term cannot be blank".into()));
            }
            if out.iter().any(|seen| seen == t) {
                return Err(StitchError::InvalidArg(format!("duplicate search term '{t}'")));
            }
            out.push(t.to_string());
        }
        if out.is_empty() {
            return Err(StitchError::InvalidArg(
                "at least one search term is required".into(),
            ));
        }
        Ok(Self(out))
    }

    /// Terms in query order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Number of terms (never zero).
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with collections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate the terms in query order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl TryFrom<Vec<String>> for TermSet {
    type Error = StitchError;

    fn try_from(v: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(v)
    }
}

impl From<TermSet> for Vec<String> {
    fn from(t: TermSet) -> Self {
        t.0
    }
}

impl fmt::Display for TermSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, t) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "'{t}'")?;
        }
        f.write_str("]")
    }
}

/// One row of a series: a date and one value per term, in the series' term order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Row key: the day, week start (Sunday) or month start the values describe.
    pub date: NaiveDate,
    /// Values aligned with [`Series::terms`].
    pub values: Vec<f64>,
}

impl Point {
    /// Convenience constructor.
    #[must_use]
    pub const fn new(date: NaiveDate, values: Vec<f64>) -> Self {
        Self { date, values }
    }
}

/// Time-indexed table of interest values.
///
/// Invariants enforced at construction:
/// - every row carries exactly one value per term
/// - dates are strictly increasing (no duplicates)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SeriesRepr")]
pub struct Series {
    terms: Vec<String>,
    points: Vec<Point>,
}

#[derive(Deserialize)]
struct SeriesRepr {
    terms: Vec<String>,
    points: Vec<Point>,
}

impl TryFrom<SeriesRepr> for Series {
    type Error = StitchError;

    fn try_from(r: SeriesRepr) -> Result<Self, Self::Error> {
        Self::new(r.terms, r.points)
    }
}

impl Series {
    /// Validate rows against the term layout and build a series.
    ///
    /// # Errors
    /// Returns `Data` when a row has the wrong width or dates are not strictly increasing.
    pub fn new(terms: Vec<String>, points: Vec<Point>) -> Result<Self, StitchError> {
        for p in &points {
            if p.values.len() != terms.len() {
                return Err(StitchError::Data(format!(
                    "row {} has {} values for {} terms",
                    p.date,
                    p.values.len(),
                    terms.len()
                )));
            }
        }
        if let Some(w) = points.windows(2).find(|w| w[0].date >= w[1].date) {
            return Err(StitchError::Data(format!(
                "series dates must be strictly increasing: {} then {}",
                w[0].date, w[1].date
            )));
        }
        Ok(Self { terms, points })
    }

    /// A series with the given columns and no rows.
    #[must_use]
    pub const fn empty(terms: Vec<String>) -> Self {
        Self {
            terms,
            points: Vec::new(),
        }
    }

    /// Column names in value order.
    #[must_use]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Rows in ascending date order.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Earliest date, if any.
    #[must_use]
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    /// Latest date, if any.
    #[must_use]
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// Position of the row keyed by `date`.
    #[must_use]
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        self.points.binary_search_by_key(&date, |p| p.date).ok()
    }

    /// Rows dated on or before `date`.
    #[must_use]
    pub fn through(&self, date: NaiveDate) -> &[Point] {
        let cut = self.points.partition_point(|p| p.date <= date);
        &self.points[..cut]
    }

    /// Rows dated on or after `date`.
    #[must_use]
    pub fn from_date(&self, date: NaiveDate) -> &[Point] {
        let cut = self.points.partition_point(|p| p.date < date);
        &self.points[cut..]
    }

    /// Values of one column in date order.
    pub fn column(&self, idx: usize) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().filter_map(move |p| p.values.get(idx).copied())
    }

    /// Multiply every value of column `idx` by `factor`.
    pub fn scale_column(&mut self, idx: usize, factor: f64) {
        for p in &mut self.points {
            if let Some(v) = p.values.get_mut(idx) {
                *v *= factor;
            }
        }
    }

    /// Apply `f` to every value in place.
    pub fn map_values(&mut self, mut f: impl FnMut(f64) -> f64) {
        for p in &mut self.points {
            for v in &mut p.values {
                *v = f(*v);
            }
        }
    }

    /// Drop every row dated on or after `date`.
    pub fn truncate_from(&mut self, date: NaiveDate) {
        let cut = self.points.partition_point(|p| p.date < date);
        self.points.truncate(cut);
    }

    /// Largest value across all terms and dates. NaN values are ignored.
    #[must_use]
    pub fn max_value(&self) -> Option<f64> {
        self.points
            .iter()
            .flat_map(|p| p.values.iter().copied())
            .filter(|v| !v.is_nan())
            .reduce(f64::max)
    }

    /// Split into columns and rows.
    #[must_use]
    pub fn into_parts(self) -> (Vec<String>, Vec<Point>) {
        (self.terms, self.points)
    }
}
