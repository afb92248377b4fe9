use chrono::NaiveDate;

use crate::{Series, StitchError};

/// Per-term multipliers computed from one adjacent segment pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleFactor {
    /// Anchor the overlap window was cut at.
    pub anchor: NaiveDate,
    /// One factor per term, in series term order. Every factor is finite and positive.
    pub factors: Vec<f64>,
}

fn ensure_same_terms(upper: &Series, lower: &Series) -> Result<(), StitchError> {
    if upper.terms() != lower.terms() {
        return Err(StitchError::Data(format!(
            "segments disagree on terms: {:?} vs {:?}",
            upper.terms(),
            lower.terms()
        )));
    }
    Ok(())
}

/// Compute the factor that brings `lower` to `upper`'s magnitude.
///
/// The overlap window is `upper` through `anchor` against `lower` from `upper`'s first
/// date. For each term the factor is `sum(upper window) / sum(lower window)`.
///
/// # Errors
/// - `Data` if the segments carry different terms or `upper` is empty.
/// - `DegenerateScale` if any factor is zero, negative or not finite, which happens when
///   a term sums to zero on either side of the overlap.
pub fn scale_factor(
    upper: &Series,
    lower: &Series,
    anchor: NaiveDate,
) -> Result<ScaleFactor, StitchError> {
    ensure_same_terms(upper, lower)?;
    let Some(upper_first) = upper.first_date() else {
        return Err(StitchError::Data("cannot scale against an empty segment".into()));
    };
    let upper_overlap = upper.through(anchor);
    let lower_overlap = lower.from_date(upper_first);

    let mut factors = Vec::with_capacity(upper.terms().len());
    for (col, term) in upper.terms().iter().enumerate() {
        let numerator: f64 = upper_overlap.iter().map(|p| p.values[col]).sum();
        let denominator: f64 = lower_overlap.iter().map(|p| p.values[col]).sum();
        let factor = numerator / denominator;
        if !(factor.is_finite() && factor > 0.0) {
            return Err(StitchError::DegenerateScale {
                term: term.clone(),
                anchor,
                numerator,
                denominator,
            });
        }
        factors.push(factor);
    }
    Ok(ScaleFactor { anchor, factors })
}

/// Rescale `lower` onto `upper` and merge them.
///
/// Every value of `lower` is multiplied by its term's factor, rows of `lower` inside the
/// overlap window are dropped, and the remaining rows are prepended to `upper`. The result
/// never contains duplicate dates.
///
/// # Errors
/// Same as [`scale_factor`]; also `Data` if the merge would break date ordering.
pub fn scale(upper: Series, lower: Series, anchor: NaiveDate) -> Result<Series, StitchError> {
    let factor = scale_factor(&upper, &lower, anchor)?;
    apply(upper, lower, &factor)
}

fn apply(upper: Series, mut lower: Series, factor: &ScaleFactor) -> Result<Series, StitchError> {
    for (col, f) in factor.factors.iter().enumerate() {
        lower.scale_column(col, *f);
    }
    if let Some(upper_first) = upper.first_date() {
        lower.truncate_from(upper_first);
    }
    let (terms, mut points) = lower.into_parts();
    let (_, upper_points) = upper.into_parts();
    points.extend(upper_points);
    Series::new(terms, points)
}

/// Fold a chain of segments into one continuous series.
///
/// `newest_first[0]` is the most recent segment and `anchors[i]` bounds the overlap
/// between `newest_first[i]` and `newest_first[i + 1]`. The oldest segment is taken as
/// the accumulator, then each newer segment in turn becomes `upper` against it, so
/// factors compound across the whole chain.
///
/// Returns the merged series and the factor used at each step, oldest pair first.
///
/// # Errors
/// - `Data` if the chain is empty or `anchors.len() != newest_first.len() - 1`.
/// - Any error of [`scale`].
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "trendstitch_core::stitch",
        skip(newest_first, anchors),
        fields(segments = newest_first.len()),
    )
)]
pub fn stitch(
    newest_first: Vec<Series>,
    anchors: &[NaiveDate],
) -> Result<(Series, Vec<ScaleFactor>), StitchError> {
    if newest_first.is_empty() {
        return Err(StitchError::Data("no segments to stitch".into()));
    }
    if anchors.len() + 1 != newest_first.len() {
        return Err(StitchError::Data(format!(
            "{} segments need {} anchors, got {}",
            newest_first.len(),
            newest_first.len() - 1,
            anchors.len()
        )));
    }

    let mut segments = newest_first.into_iter().rev();
    let Some(mut acc) = segments.next() else {
        return Err(StitchError::Data("no segments to stitch".into()));
    };
    let mut applied = Vec::with_capacity(anchors.len());
    for (upper, anchor) in segments.zip(anchors.iter().rev()) {
        let factor = scale_factor(&upper, &acc, *anchor)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            anchor = %factor.anchor,
            factors = ?factor.factors,
            "scaled older segment onto newer"
        );
        acc = apply(upper, acc, &factor)?;
        applied.push(factor);
    }
    Ok((acc, applied))
}
