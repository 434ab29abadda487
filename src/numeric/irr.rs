//! Internal rate of return of a monthly flow series
//!
//! Newton-Raphson on the monthly rate, falling back to bisection when the
//! derivative vanishes or the iteration does not settle.

use super::rates::npv;

const TOLERANCE: f64 = 1e-10;
const MAX_ITERATIONS: usize = 1000;
const MIN_RATE: f64 = -0.99;
const MAX_RATE: f64 = 10.0;

/// Annualize a monthly rate by compounding over 12 months
pub fn annualize_monthly_rate(monthly: f64) -> f64 {
    (1.0 + monthly).powi(12) - 1.0
}

/// Monthly IRR of `flows` (index = month), or `None` when the series has no
/// sign change or no root is found in `[-99%, 1000%]` per month.
pub fn calculate_irr(flows: &[f64]) -> Option<f64> {
    if flows.is_empty() {
        return None;
    }

    let has_inflow = flows.iter().any(|&cf| cf > TOLERANCE);
    let has_outflow = flows.iter().any(|&cf| cf < -TOLERANCE);
    if !has_inflow || !has_outflow {
        return None;
    }

    let mut rate = 0.01;
    for _ in 0..MAX_ITERATIONS {
        let (value, slope) = npv_with_slope(flows, rate);
        if slope.abs() < 1e-20 {
            return bisect(flows);
        }

        let next = (rate - value / slope).clamp(MIN_RATE, MAX_RATE);
        if (next - rate).abs() < TOLERANCE {
            return Some(next);
        }
        rate = next;
    }

    bisect(flows)
}

fn npv_with_slope(flows: &[f64], rate: f64) -> (f64, f64) {
    let mut value = 0.0;
    let mut slope = 0.0;
    for (t, &cf) in flows.iter().enumerate() {
        let t = t as i32;
        value += cf / (1.0 + rate).powi(t);
        if t > 0 {
            slope -= t as f64 * cf / (1.0 + rate).powi(t + 1);
        }
    }
    (value, slope)
}

fn bisect(flows: &[f64]) -> Option<f64> {
    let mut low = MIN_RATE;
    let mut high = MAX_RATE;
    let mut value_low = npv(flows, low);

    if value_low * npv(flows, high) > 0.0 {
        return None;
    }

    for _ in 0..MAX_ITERATIONS {
        let mid = (low + high) / 2.0;
        let value_mid = npv(flows, mid);

        if value_mid.abs() < TOLERANCE || (high - low) / 2.0 < TOLERANCE {
            return Some(mid);
        }

        if value_mid * value_low < 0.0 {
            high = mid;
        } else {
            low = mid;
            value_low = value_mid;
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_single_year_return() {
        // Pay 1000 today, receive 1100 after 12 months -> 10% a.a.
        let mut flows = vec![-1000.0];
        flows.extend(vec![0.0; 11]);
        flows.push(1100.0);

        let monthly = calculate_irr(&flows).unwrap();
        assert_relative_eq!(annualize_monthly_rate(monthly), 0.10, epsilon = 1e-6);
    }

    #[test]
    fn test_level_annuity_matches_pmt_rate() {
        let payment = crate::numeric::pmt(0.02, 24, 5000.0);
        let mut flows = vec![5000.0];
        flows.extend(vec![-payment; 24]);

        let monthly = calculate_irr(&flows).unwrap();
        assert_relative_eq!(monthly, 0.02, epsilon = 1e-7);
    }

    #[test]
    fn test_no_sign_change() {
        assert!(calculate_irr(&[-100.0, -5.0, -5.0]).is_none());
        assert!(calculate_irr(&[]).is_none());
        assert!(calculate_irr(&[0.0, 0.0]).is_none());
    }
}
