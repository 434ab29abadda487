//! Sale parameters for a solar-purchase proposal

use serde::{Deserialize, Serialize};

use crate::numeric::monthly_rate_from_annual_pct;

/// How a cash payment is settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CashMode {
    Pix,
    Debit,
    /// Credit card, single charge
    Credit,
}

/// Interest rate as quoted, either per month or per year (percent)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterestRate {
    /// Percent per month, e.g. `1.99`
    MonthlyPct(f64),
    /// Percent per year, converted by monthly compounding
    AnnualPct(f64),
}

impl InterestRate {
    /// Effective monthly rate as a fraction; non-finite input is 0
    pub fn monthly(&self) -> f64 {
        match *self {
            InterestRate::MonthlyPct(pct) if pct.is_finite() => pct / 100.0,
            InterestRate::MonthlyPct(_) => 0.0,
            InterestRate::AnnualPct(pct) => monthly_rate_from_annual_pct(pct),
        }
    }
}

impl Default for InterestRate {
    fn default() -> Self {
        InterestRate::MonthlyPct(0.0)
    }
}

/// Merchant-discount rates (fractions) charged by the acquirer per payment mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MerchantRates {
    #[serde(default)]
    pub pix: f64,
    #[serde(default)]
    pub debit: f64,
    #[serde(default)]
    pub credit: f64,
    /// Applied on top of each card installment
    #[serde(default)]
    pub installments: f64,
}

impl MerchantRates {
    pub fn for_cash(&self, mode: CashMode) -> f64 {
        match mode {
            CashMode::Pix => self.pix,
            CashMode::Debit => self.debit,
            CashMode::Credit => self.credit,
        }
    }
}

/// Payment condition with only the fields that condition needs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "condition", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentCondition {
    /// Whole capex at month 0
    Cash { mode: CashMode },
    /// Card installments, months 1..=count
    Installments {
        count: u32,
        #[serde(default)]
        card_rate: InterestRate,
    },
    /// Optional down payment at month 0, remaining principal amortized over months 1..=count
    Financing {
        count: u32,
        #[serde(default)]
        down_payment: f64,
        #[serde(default)]
        rate: InterestRate,
    },
}

impl PaymentCondition {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentCondition::Cash { .. } => "CASH",
            PaymentCondition::Installments { .. } => "INSTALLMENTS",
            PaymentCondition::Financing { .. } => "FINANCING",
        }
    }
}

/// Technical and financial inputs of a proposal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleParameters {
    /// Monthly consumption (kWh)
    pub consumption_kwh: f64,
    /// Full tariff today (currency/kWh)
    pub full_tariff: f64,
    /// Annual energy-price inflation (percent)
    #[serde(default)]
    pub annual_inflation_pct: f64,
    /// Minimum monthly charge still owed to the utility
    #[serde(default)]
    pub minimum_charge: f64,
    pub horizon_months: u32,
    /// Total capital cost of the system
    pub capex: f64,
    pub payment: PaymentCondition,
    #[serde(default)]
    pub merchant_rates: MerchantRates,
    /// Annual discount rate (percent) for NPV; no NPV when absent
    #[serde(default)]
    pub annual_discount_rate_pct: Option<f64>,
}

impl SaleParameters {
    /// Same sale under a different payment condition
    pub fn with_payment(&self, payment: PaymentCondition) -> Self {
        Self {
            payment,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_payment_condition_tagging() {
        let cash: PaymentCondition = serde_json::from_str(r#"{"condition": "CASH", "mode": "PIX"}"#).unwrap();
        assert_eq!(cash, PaymentCondition::Cash { mode: CashMode::Pix });

        let financing: PaymentCondition = serde_json::from_str(
            r#"{"condition": "FINANCING", "count": 60, "down_payment": 5000, "rate": {"annual_pct": 18.0}}"#,
        )
        .unwrap();
        assert_eq!(
            financing,
            PaymentCondition::Financing {
                count: 60,
                down_payment: 5000.0,
                rate: InterestRate::AnnualPct(18.0),
            }
        );
        assert_eq!(financing.label(), "FINANCING");

        let installments: PaymentCondition =
            serde_json::from_str(r#"{"condition": "INSTALLMENTS", "count": 10}"#).unwrap();
        assert_eq!(
            installments,
            PaymentCondition::Installments { count: 10, card_rate: InterestRate::MonthlyPct(0.0) }
        );
    }

    #[test]
    fn test_interest_rate_monthly() {
        assert_relative_eq!(InterestRate::MonthlyPct(1.99).monthly(), 0.0199);
        assert_relative_eq!(
            (1.0 + InterestRate::AnnualPct(26.82).monthly()).powi(12),
            1.2682,
            epsilon = 1e-12
        );
        assert_eq!(InterestRate::MonthlyPct(f64::NAN).monthly(), 0.0);
    }

    #[test]
    fn test_merchant_rate_lookup() {
        let rates = MerchantRates { pix: 0.0, debit: 0.012, credit: 0.031, installments: 0.045 };
        assert_eq!(rates.for_cash(CashMode::Debit), 0.012);
        assert_eq!(rates.for_cash(CashMode::Credit), 0.031);
    }
}
