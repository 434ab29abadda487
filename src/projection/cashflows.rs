//! Projection output: parallel monthly series plus headline figures

use serde::{Deserialize, Serialize};

use crate::numeric::{annualize_monthly_rate, calculate_irr};

/// One month of the projection, as a row
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthRow {
    pub month: u32,
    pub economy: f64,
    pub payment: f64,
    pub flow: f64,
    pub balance: f64,
}

/// Month-by-month cash flow of a proposal
///
/// All four series have `horizon + 1` entries; index 0 is the purchase month.
/// `flow[m] = economy[m] - payment[m]` and `balance` is the running sum of `flow`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub economy: Vec<f64>,
    pub payment: Vec<f64>,
    pub flow: Vec<f64>,
    pub balance: Vec<f64>,
    /// First month in `1..=horizon` with a non-negative balance
    pub payback: Option<u32>,
    /// Return on investment as a fraction
    pub roi: f64,
    pub npv: Option<f64>,
}

impl Projection {
    /// Build the derived series from economy and payment
    ///
    /// Payback, ROI and NPV are left for the caller to fill in.
    pub fn from_series(economy: Vec<f64>, payment: Vec<f64>) -> Self {
        let flow: Vec<f64> = economy.iter().zip(&payment).map(|(e, p)| e - p).collect();

        let mut balance = Vec::with_capacity(flow.len());
        let mut running = 0.0;
        for (m, &f) in flow.iter().enumerate() {
            running = if m == 0 { f } else { running + f };
            balance.push(running);
        }

        let payback = balance
            .iter()
            .enumerate()
            .skip(1)
            .find(|&(_, &b)| b >= 0.0)
            .map(|(m, _)| m as u32);

        Self {
            economy,
            payment,
            flow,
            balance,
            payback,
            roi: 0.0,
            npv: None,
        }
    }

    /// Number of projected months after month 0
    pub fn horizon(&self) -> u32 {
        self.flow.len().saturating_sub(1) as u32
    }

    pub fn rows(&self) -> impl Iterator<Item = MonthRow> + '_ {
        (0..self.flow.len()).map(move |m| MonthRow {
            month: m as u32,
            economy: self.economy[m],
            payment: self.payment[m],
            flow: self.flow[m],
            balance: self.balance[m],
        })
    }

    /// Annualized internal rate of return of the flow series
    pub fn irr(&self) -> Option<f64> {
        calculate_irr(&self.flow).map(annualize_monthly_rate)
    }

    pub fn summary(&self) -> ProjectionSummary {
        let total_economy: f64 = self.economy.iter().sum();
        let total_payment: f64 = self.payment.iter().sum();

        ProjectionSummary {
            horizon_months: self.horizon(),
            total_economy,
            total_payment,
            net: total_economy - total_payment,
            final_balance: self.balance.last().copied().unwrap_or(0.0),
            payback: self.payback,
            roi: self.roi,
            npv: self.npv,
            irr: self.irr(),
        }
    }
}

/// Headline figures of a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub horizon_months: u32,
    pub total_economy: f64,
    pub total_payment: f64,
    pub net: f64,
    pub final_balance: f64,
    pub payback: Option<u32>,
    pub roi: f64,
    pub npv: Option<f64>,
    /// Annual IRR, when the flows change sign
    pub irr: Option<f64>,
}
