//! Numeric helpers shared by the aggregators.
//!
//! Every helper here has an explicit empty-set policy: an average or
//! ratio over nothing is 0.0, never NaN.

/// Arithmetic mean. Empty input yields 0.0.
pub fn mean<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// `part / whole` with the denominator floored at 1.
pub fn share(part: usize, whole: usize) -> f64 {
    part as f64 / whole.max(1) as f64
}

/// `part / whole × 100`, or 0.0 when `whole` is zero.
pub fn percent_or_zero(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}
