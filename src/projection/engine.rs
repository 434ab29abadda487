//! Cash-flow / ROI projection for a solar purchase

use crate::numeric::{finite_or_zero, monthly_rate_from_annual_pct, non_negative, npv, pmt};
use super::cashflows::Projection;
use super::sale::{CashMode, PaymentCondition, SaleParameters};

/// Longest horizon simulated; longer requests are clamped (100 years)
pub const MAX_HORIZON_MONTHS: u32 = 1200;

/// Sale parameters after coercion: finite, and non-negative where it matters
#[derive(Debug, Clone)]
struct Coerced {
    consumption_kwh: f64,
    full_tariff: f64,
    monthly_inflation: f64,
    minimum_charge: f64,
    horizon: u32,
    schedule: Schedule,
    monthly_discount: Option<f64>,
}

/// Payment schedule derived from the payment condition
#[derive(Debug, Clone, Copy, PartialEq)]
enum Schedule {
    Upfront { outlay: f64 },
    Amortized { upfront: f64, installment: f64, count: u32 },
}

impl Coerced {
    fn from_params(params: &SaleParameters) -> Self {
        let capex = non_negative(params.capex);

        let schedule = match params.payment {
            PaymentCondition::Cash { mode } => {
                let mdr = cash_mdr(params, mode);
                Schedule::Upfront { outlay: capex * (1.0 + mdr) }
            }
            PaymentCondition::Installments { count, card_rate } => {
                let mdr = non_negative(params.merchant_rates.installments);
                Schedule::Amortized {
                    upfront: 0.0,
                    installment: pmt(card_rate.monthly(), count, capex) * (1.0 + mdr),
                    count,
                }
            }
            PaymentCondition::Financing { count, down_payment, rate } => {
                let down_payment = non_negative(down_payment);
                let principal = (capex - down_payment).max(0.0);
                Schedule::Amortized {
                    upfront: down_payment,
                    installment: pmt(rate.monthly(), count, principal),
                    count,
                }
            }
        };

        Self {
            consumption_kwh: non_negative(params.consumption_kwh),
            full_tariff: non_negative(params.full_tariff),
            monthly_inflation: monthly_rate_from_annual_pct(finite_or_zero(params.annual_inflation_pct)),
            minimum_charge: non_negative(params.minimum_charge),
            horizon: params.horizon_months.min(MAX_HORIZON_MONTHS),
            schedule,
            monthly_discount: params
                .annual_discount_rate_pct
                .filter(|r| r.is_finite())
                .map(monthly_rate_from_annual_pct),
        }
    }
}

fn cash_mdr(params: &SaleParameters, mode: CashMode) -> f64 {
    non_negative(params.merchant_rates.for_cash(mode))
}

/// Stateless projector; every call builds a fresh [`Projection`]
#[derive(Debug, Clone, Copy, Default)]
pub struct CashFlowProjector;

impl CashFlowProjector {
    pub fn new() -> Self {
        Self
    }

    /// Simulate economy, payments and balance month by month. Never fails.
    pub fn compute_roi(&self, params: &SaleParameters) -> Projection {
        let inputs = Coerced::from_params(params);
        let months = inputs.horizon as usize + 1;

        let economy = self.economy_series(&inputs, months);
        let payment = self.payment_series(&inputs, months);

        let mut projection = Projection::from_series(economy, payment);
        projection.roi = self.roi(&inputs, &projection);
        projection.npv = inputs.monthly_discount.map(|rate| npv(&projection.flow, rate));
        projection
    }

    /// Month 0 has no economy; month m bills at the tariff inflated m-1 times
    fn economy_series(&self, inputs: &Coerced, months: usize) -> Vec<f64> {
        let growth = 1.0 + inputs.monthly_inflation;
        let mut economy = vec![0.0; months];
        for (m, value) in economy.iter_mut().enumerate().skip(1) {
            let tariff = inputs.full_tariff * growth.powi(m as i32 - 1);
            *value = (inputs.consumption_kwh * tariff - inputs.minimum_charge).max(0.0);
        }
        economy
    }

    fn payment_series(&self, inputs: &Coerced, months: usize) -> Vec<f64> {
        let mut payment = vec![0.0; months];
        match inputs.schedule {
            Schedule::Upfront { outlay } => {
                payment[0] = outlay;
            }
            Schedule::Amortized { upfront, installment, count } => {
                payment[0] = upfront;
                let last = (count as usize).min(months - 1);
                for value in &mut payment[1..=last] {
                    *value = installment;
                }
            }
        }
        payment
    }

    fn roi(&self, inputs: &Coerced, projection: &Projection) -> f64 {
        let total_economy: f64 = projection.economy.iter().sum();
        let cost = match inputs.schedule {
            Schedule::Upfront { outlay } => outlay,
            Schedule::Amortized { .. } => projection.payment.iter().sum(),
        };
        if cost == 0.0 {
            0.0
        } else {
            (total_economy - cost) / cost
        }
    }
}

/// Convenience wrapper around [`CashFlowProjector::compute_roi`]
pub fn compute_roi(params: &SaleParameters) -> Projection {
    CashFlowProjector::new().compute_roi(params)
}
