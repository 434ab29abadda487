//! Scenario runner for comparing payment conditions and batch projections
//!
//! A proposal is usually shown under several payment conditions side by side.
//! Each projection is independent, so batches are spread over the rayon pool.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::projection::{CashFlowProjector, PaymentCondition, Projection, ProjectionSummary, SaleParameters};

/// One payment condition's outcome for a proposal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionOutcome {
    pub condition: PaymentCondition,
    pub summary: ProjectionSummary,
}

/// Runs a [`CashFlowProjector`] over many inputs
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
/// let outcomes = runner.compare(&params, &[
///     PaymentCondition::Cash { mode: CashMode::Pix },
///     PaymentCondition::Installments { count: 12, card_rate: InterestRate::MonthlyPct(1.99) },
/// ]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    projector: CashFlowProjector,
}

impl ScenarioRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Project a single sale
    pub fn run(&self, params: &SaleParameters) -> Projection {
        self.projector.compute_roi(params)
    }

    /// Project many sales in parallel, preserving input order
    pub fn run_batch(&self, params: &[SaleParameters]) -> Vec<Projection> {
        log::debug!("projecting batch of {} sales", params.len());
        params.par_iter().map(|p| self.projector.compute_roi(p)).collect()
    }

    /// Project the same sale under each payment condition
    pub fn compare(&self, params: &SaleParameters, conditions: &[PaymentCondition]) -> Vec<ConditionOutcome> {
        log::debug!("comparing {} payment conditions", conditions.len());
        conditions
            .par_iter()
            .map(|&condition| ConditionOutcome {
                condition,
                summary: self.projector.compute_roi(&params.with_payment(condition)).summary(),
            })
            .collect()
    }

    /// Condition with the earliest payback, ties broken by higher ROI
    pub fn fastest_payback<'a>(&self, outcomes: &'a [ConditionOutcome]) -> Option<&'a ConditionOutcome> {
        outcomes
            .iter()
            .filter(|o| o.summary.payback.is_some())
            .min_by(|a, b| {
                a.summary
                    .payback
                    .cmp(&b.summary.payback)
                    .then_with(|| b.summary.roi.total_cmp(&a.summary.roi))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::{CashMode, InterestRate, MerchantRates};

    fn proposal() -> SaleParameters {
        SaleParameters {
            consumption_kwh: 800.0,
            full_tariff: 0.95,
            annual_inflation_pct: 7.0,
            minimum_charge: 50.0,
            horizon_months: 300,
            capex: 30_000.0,
            payment: PaymentCondition::Cash { mode: CashMode::Pix },
            merchant_rates: MerchantRates { pix: 0.0, debit: 0.01, credit: 0.03, installments: 0.04 },
            annual_discount_rate_pct: Some(10.0),
        }
    }

    fn conditions() -> Vec<PaymentCondition> {
        vec![
            PaymentCondition::Cash { mode: CashMode::Pix },
            PaymentCondition::Installments { count: 12, card_rate: InterestRate::MonthlyPct(1.99) },
            PaymentCondition::Financing { count: 60, down_payment: 0.0, rate: InterestRate::AnnualPct(24.0) },
        ]
    }

    #[test]
    fn test_compare_keeps_order_and_differs() {
        let runner = ScenarioRunner::new();
        let outcomes = runner.compare(&proposal(), &conditions());

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].condition.label(), "CASH");
        assert_eq!(outcomes[2].condition.label(), "FINANCING");

        // Paying interest costs more than paying by PIX
        assert!(outcomes[1].summary.total_payment > outcomes[0].summary.total_payment);
        assert!(outcomes[2].summary.total_payment > outcomes[0].summary.total_payment);
        assert!(outcomes[0].summary.roi > outcomes[1].summary.roi);
    }

    #[test]
    fn test_batch_matches_single_runs() {
        let runner = ScenarioRunner::new();
        let base = proposal();
        let batch: Vec<SaleParameters> = conditions().into_iter().map(|c| base.with_payment(c)).collect();

        let results = runner.run_batch(&batch);
        for (params, result) in batch.iter().zip(&results) {
            assert_eq!(&runner.run(params), result);
        }
    }

    #[test]
    fn test_fastest_payback() {
        let runner = ScenarioRunner::new();
        let outcomes = runner.compare(&proposal(), &conditions());
        let best = runner.fastest_payback(&outcomes).unwrap();
        let min = outcomes.iter().filter_map(|o| o.summary.payback).min().unwrap();
        assert_eq!(best.summary.payback, Some(min));
    }
}
