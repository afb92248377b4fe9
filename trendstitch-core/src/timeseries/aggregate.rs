use chrono::NaiveDate;

use crate::range::period_start;
use crate::{Frequency, Point, Series, StitchError};

/// Generic resampler that groups rows by a bucket function and averages each term
/// within each bucket. Rows must already be sorted, which `Series` guarantees.
fn resample_by<F>(series: &Series, bucket_of: F) -> Result<Series, StitchError>
where
    F: Fn(NaiveDate) -> NaiveDate,
{
    let width = series.terms().len();
    let mut out: Vec<Point> = Vec::new();
    let mut sums = vec![0.0_f64; width];
    let mut count = 0_u32;
    let mut cur_bucket: Option<NaiveDate> = None;

    for p in series.points() {
        let bucket = bucket_of(p.date);
        if cur_bucket.is_some_and(|b| b != bucket) {
            finalize_bucket(&mut out, cur_bucket, &mut sums, &mut count);
        }
        cur_bucket = Some(bucket);
        for (s, v) in sums.iter_mut().zip(&p.values) {
            *s += *v;
        }
        count += 1;
    }
    finalize_bucket(&mut out, cur_bucket, &mut sums, &mut count);

    Series::new(series.terms().to_vec(), out)
}

fn finalize_bucket(
    out: &mut Vec<Point>,
    bucket: Option<NaiveDate>,
    sums: &mut [f64],
    count: &mut u32,
) {
    let Some(date) = bucket else {
        return;
    };
    if *count == 0 {
        return;
    }
    let n = f64::from(*count);
    out.push(Point::new(date, sums.iter().map(|s| s / n).collect()));
    sums.iter_mut().for_each(|s| *s = 0.0);
    *count = 0;
}

/// Average `series` into `frequency` buckets keyed by period start.
///
/// Weekly buckets start on Sunday, monthly buckets on the first of the month. Daily
/// returns the series unchanged. Buckets at either edge may be partial; they are averaged
/// over the rows they contain.
///
/// # Errors
/// Returns `Data` only if the input violates series invariants, which a valid `Series`
/// cannot.
pub fn aggregate(series: &Series, frequency: Frequency) -> Result<Series, StitchError> {
    match frequency {
        Frequency::Daily => Ok(series.clone()),
        other => resample_by(series, |d| period_start(d, other)),
    }
}
