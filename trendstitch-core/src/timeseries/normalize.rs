use crate::{Series, StitchError};

/// Global maximum of a normalized series.
pub const NORMALIZED_MAX: f64 = 100.0;

/// Rescale `series` so its largest value across all terms and dates is exactly 100.
///
/// Each value becomes `v / max * 100`. A series whose maximum is already exactly 100 is
/// returned unchanged, so normalizing twice is a no-op.
///
/// # Errors
/// Returns `Normalization` when the series is empty or its maximum is zero, negative or
/// not finite.
pub fn normalize(mut series: Series) -> Result<Series, StitchError> {
    let max = series.max_value().unwrap_or(0.0);
    if !(max.is_finite() && max > 0.0) {
        return Err(StitchError::Normalization { max });
    }
    if max == NORMALIZED_MAX {
        return Ok(series);
    }
    series.map_values(|v| v / max * NORMALIZED_MAX);
    Ok(series)
}
