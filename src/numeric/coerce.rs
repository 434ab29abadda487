//! Coerce-with-default helpers
//!
//! Every engine normalizes its inputs through these before doing any arithmetic,
//! so the default policy lives in one place.

/// Return `value` when it is present and finite, otherwise `default`
pub fn finite_or(value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => default,
    }
}

/// Return `value` when finite, otherwise 0
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Clamp to `[0, +inf)`, mapping non-finite input to 0
pub fn non_negative(value: f64) -> f64 {
    finite_or_zero(value).max(0.0)
}

/// Round half-up to 2 decimals (cents)
///
/// Ties go towards positive infinity, so `-0.005` rounds to `-0.00` and `0.005` to `0.01`.
pub fn round2(value: f64) -> f64 {
    let rounded = (value * 100.0 + 0.5).floor() / 100.0;
    // Collapse -0.0 so serialized output never shows a signed zero
    if rounded == 0.0 { 0.0 } else { rounded }
}
