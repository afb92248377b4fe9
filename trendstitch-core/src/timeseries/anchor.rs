use chrono::NaiveDate;

use crate::{Series, StitchError};

/// Anchor date bounding the overlap window between `segment` and the next, older fetch.
///
/// For each term, find the first row with a nonzero value; take the latest of those rows
/// (terms with no signal at all are ignored, and with no signal anywhere this is row 0).
/// The anchor row is the later of that row and `ceil(len / 4)`, so the overlap window
/// always covers at least a quarter of the segment.
///
/// # Errors
/// Returns `Data` when the anchor would land on the segment's last row. The next window
/// would then end where this one ends, so no anchor exists that lets the walk progress.
pub fn overlap_anchor(segment: &Series) -> Result<NaiveDate, StitchError> {
    let points = segment.points();
    let n = points.len();
    let latest_first_signal = (0..segment.terms().len())
        .filter_map(|col| {
            points
                .iter()
                .position(|p| p.values.get(col).is_some_and(|v| *v != 0.0 && !v.is_nan()))
        })
        .max()
        .unwrap_or(0);
    let quartile = n.div_ceil(4);
    let idx = latest_first_signal.max(quartile);
    if idx + 1 >= n {
        return Err(StitchError::Data(format!(
            "cannot anchor a {n}-row segment: anchor row {idx} is not before its last row"
        )));
    }
    Ok(points[idx].date)
}
