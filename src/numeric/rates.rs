//! Interest-rate conversion, annuity payments and discounting

/// Rates with an absolute value below this are treated as zero
pub const RATE_EPSILON: f64 = 1e-12;

/// Convert an annual percentage (e.g. `12.0` for 12% a.a.) to the effective monthly
/// rate as a fraction, by compounding: `(1 + pct/100)^(1/12) - 1`.
///
/// Non-finite input and annual rates at or below -100% give a monthly rate of 0.
/// Used for energy inflation, card/financing interest and NPV discounting alike.
pub fn monthly_rate_from_annual_pct(annual_pct: f64) -> f64 {
    if !annual_pct.is_finite() {
        return 0.0;
    }
    let base = 1.0 + annual_pct / 100.0;
    if base <= 0.0 {
        return 0.0;
    }
    base.powf(1.0 / 12.0) - 1.0
}

/// Level payment that amortizes `pv` over `n` periods at `rate` per period
///
/// `PMT = pv * r * (1+r)^n / ((1+r)^n - 1)`, degrading to `pv / n` for a zero rate.
/// Returns 0 when `n == 0`. When `(1+r)^n` overflows the payment is the
/// perpetuity limit `pv * r`.
pub fn pmt(rate: f64, n: u32, pv: f64) -> f64 {
    if n == 0 {
        return 0.0;
    }
    if rate.abs() < RATE_EPSILON {
        return pv / n as f64;
    }
    let growth = (1.0 + rate).powf(n as f64);
    if growth.is_infinite() {
        return pv * rate;
    }
    let denominator = growth - 1.0;
    if denominator.abs() < RATE_EPSILON || !denominator.is_finite() {
        return pv / n as f64;
    }
    pv * rate * growth / denominator
}

/// Discount factor to period `t` at a per-period `rate`
pub fn discount_factor(rate: f64, t: u32) -> f64 {
    (1.0 + rate).powi(-(t as i32))
}

/// Net present value of `flows` (index = period, period 0 undiscounted)
pub fn npv(flows: &[f64], rate: f64) -> f64 {
    flows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf * discount_factor(rate, t as u32))
        .sum()
}
