//! Deterministic "true" interest curves the mock vendor samples from.

use std::f64::consts::TAU;

use chrono::{Datelike, Days, NaiveDate};
use trendstitch_core::Frequency;
use trendstitch_core::range::{month_end, period_start};

/// Term that always reports zero interest.
pub const ZERO_TERM: &str = "ZERO";

fn fnv1a(s: &str) -> u64 {
    let mut h: u64 = 0xcbf2_9ce4_8422_2325;
    for b in s.bytes() {
        h ^= u64::from(b);
        h = h.wrapping_mul(0x0000_0100_0000_01b3);
    }
    h
}

#[allow(clippy::cast_precision_loss)]
fn param(h: u64, shift: u32, modulo: u64) -> f64 {
    ((h >> shift) % modulo) as f64
}

/// Underlying daily interest for `term` on `date`. Always strictly positive except for
/// [`ZERO_TERM`].
#[must_use]
pub fn true_interest(term: &str, date: NaiveDate) -> f64 {
    if term == ZERO_TERM {
        return 0.0;
    }
    let h = fnv1a(term);
    let base = 20.0 + param(h, 0, 30);
    let amplitude = 5.0 + param(h, 8, 10);
    let period = 30.0 + param(h, 16, 335);
    let phase = param(h, 24, 1000) / 1000.0 * TAU;
    let slope = param(h, 40, 50) / 10.0;

    let t = f64::from(date.num_days_from_ce() - 730_120);
    let v = base
        + amplitude * (TAU * t / period + phase).sin()
        + 2.0 * (TAU * t / 7.0).sin()
        + slope * t / 365.0;
    v.max(1.0)
}

/// Last day of the period keyed by `key`.
fn period_end(key: NaiveDate, g: Frequency) -> NaiveDate {
    match g {
        Frequency::Daily => key,
        Frequency::Weekly => key + Days::new(6),
        Frequency::Monthly => month_end(key),
    }
}

/// Next period key after `key`.
pub fn next_period(key: NaiveDate, g: Frequency) -> NaiveDate {
    period_end(key, g) + Days::new(1)
}

/// Mean of the true curve over the whole period keyed by `key`.
#[must_use]
pub fn period_mean(term: &str, key: NaiveDate, g: Frequency) -> f64 {
    let end = period_end(key, g);
    let mut sum = 0.0;
    let mut n = 0.0;
    let mut d = key;
    while d <= end {
        sum += true_interest(term, d);
        n += 1.0;
        d = d + Days::new(1);
    }
    sum / n
}

/// Period keys at granularity `g` covering `[start, end]`, starting at the period that
/// contains `start`.
#[must_use]
pub fn period_keys(start: NaiveDate, end: NaiveDate, g: Frequency) -> Vec<NaiveDate> {
    let mut out = Vec::new();
    let mut k = period_start(start, g);
    while k <= end {
        out.push(k);
        k = next_period(k, g);
    }
    out
}
