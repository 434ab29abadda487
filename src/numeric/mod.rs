//! Numeric-safety helpers shared by the billing and projection engines

mod coerce;
mod rates;
mod irr;

pub use coerce::{finite_or, finite_or_zero, non_negative, round2};
pub use rates::{monthly_rate_from_annual_pct, pmt, discount_factor, npv, RATE_EPSILON};
pub use irr::{calculate_irr, annualize_monthly_rate};
