//! Billing reconciliation: invoice reading + contract terms -> itemized bill

use chrono::{DateTime, Utc};

use crate::config::RegionDefaults;
use crate::error::MissingConsumptionError;
use crate::locale::format_amount;
use crate::numeric::{finite_or, non_negative};
use super::bill::{Bill, BillMetadata, LineItem, LineItemCode};
use super::reading::{ContractTerms, RawInvoiceReading};

/// Version tag stamped on every bill
pub const ENGINE_VERSION: &str = concat!("reconciler/", env!("CARGO_PKG_VERSION"));

/// Reading and terms after defaults have been applied
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedInputs {
    pub consumption_kwh: f64,
    pub quota_kwh: f64,
    pub discount_fraction: f64,
    pub full_tariff: f64,
    pub discounted_tariff: f64,
    pub credits_kwh: f64,
    pub compensated_kwh: f64,
    pub public_lighting_fee: f64,
    pub tariff_flag_fee: f64,
    pub other_charges: f64,
}

impl NormalizedInputs {
    /// Energy beyond the quota after netting credits, floored at 0
    pub fn excess_kwh(&self) -> f64 {
        (self.consumption_kwh - self.quota_kwh - self.credits_kwh + self.compensated_kwh).max(0.0)
    }
}

/// Stateless billing engine holding only the regional defaults
#[derive(Debug, Clone, Default)]
pub struct BillingReconciler {
    region: RegionDefaults,
}

impl BillingReconciler {
    pub fn new(region: RegionDefaults) -> Self {
        Self { region }
    }

    /// Apply the default policy to a reading and its terms
    ///
    /// Fails only when the reading has no finite consumption.
    pub fn normalize(
        &self,
        reading: &RawInvoiceReading,
        terms: &ContractTerms,
    ) -> Result<NormalizedInputs, MissingConsumptionError> {
        let consumption_kwh = match reading.consumption_kwh {
            Some(v) if v.is_finite() => v,
            _ => {
                return Err(MissingConsumptionError {
                    contract_id: terms.contract_id.clone(),
                })
            }
        };

        let discount_fraction = finite_or(terms.discount_fraction, 0.0);

        let full_tariff = match reading.full_tariff {
            Some(v) if v.is_finite() => v,
            _ => {
                log::debug!(
                    "contract {}: reading has no full tariff, using regional default {}",
                    terms.contract_id, self.region.full_tariff
                );
                self.region.full_tariff
            }
        };

        // A floor tariff printed on the invoice wins over the contract discount
        let discounted_tariff = finite_or(reading.discounted_tariff, full_tariff * (1.0 - discount_fraction));

        let credits_kwh = finite_or(reading.prior_credits_kwh, 0.0) + finite_or(reading.current_credits_kwh, 0.0);

        Ok(NormalizedInputs {
            consumption_kwh,
            quota_kwh: non_negative(finite_or(terms.contracted_quota_kwh, 0.0)),
            discount_fraction,
            full_tariff,
            discounted_tariff,
            credits_kwh,
            compensated_kwh: finite_or(reading.compensated_kwh, 0.0),
            public_lighting_fee: finite_or(reading.public_lighting_fee, 0.0),
            tariff_flag_fee: finite_or(reading.tariff_flag_fee, 0.0),
            other_charges: finite_or(reading.other_charges, 0.0),
        })
    }

    /// Reconcile one reading against one contract, stamped with the current time
    pub fn compute_bill(
        &self,
        reading: &RawInvoiceReading,
        terms: &ContractTerms,
    ) -> Result<Bill, MissingConsumptionError> {
        self.compute_bill_at(reading, terms, Utc::now())
    }

    /// Reconcile with an explicit computation timestamp (deterministic)
    ///
    /// All five items are always present. An excluded charge keeps its amount
    /// with `included: false`, taken from the contract flag, and stays out of the total.
    pub fn compute_bill_at(
        &self,
        reading: &RawInvoiceReading,
        terms: &ContractTerms,
        computed_at: DateTime<Utc>,
    ) -> Result<Bill, MissingConsumptionError> {
        let inputs = self.normalize(reading, terms)?;
        let excess_kwh = inputs.excess_kwh();

        let items = vec![
            LineItem::new(LineItemCode::Quota, inputs.quota_kwh * inputs.discounted_tariff, true),
            LineItem::new(LineItemCode::Excess, excess_kwh * inputs.full_tariff, excess_kwh > 0.0),
            LineItem::new(LineItemCode::PublicLighting, inputs.public_lighting_fee, terms.include_public_lighting),
            LineItem::new(LineItemCode::TariffFlag, inputs.tariff_flag_fee, terms.include_tariff_flag),
            LineItem::new(LineItemCode::OtherCharges, inputs.other_charges, terms.include_other_charges),
        ];

        let metadata = BillMetadata {
            state: label_or(&reading.state, &self.region.state),
            distributor: label_or(&reading.distributor, &self.region.distributor),
            reference_month: reading.reference_month.clone(),
            contract_id: terms.contract_id.clone(),
            computed_at,
            engine_version: ENGINE_VERSION.to_string(),
        };

        Ok(Bill::from_items(items, excess_kwh, metadata, summary_sentence(&inputs, excess_kwh)))
    }
}

fn label_or(label: &Option<String>, default: &str) -> String {
    match label.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => default.to_string(),
    }
}

fn summary_sentence(inputs: &NormalizedInputs, excess_kwh: f64) -> String {
    format!(
        "Cota contratada de {} kWh faturada a R$ {}/kWh; consumo de {} kWh com {} kWh de créditos; \
         excedente de {} kWh faturado a R$ {}/kWh.",
        format_amount(inputs.quota_kwh),
        format_amount(inputs.discounted_tariff),
        format_amount(inputs.consumption_kwh),
        format_amount(inputs.credits_kwh),
        format_amount(excess_kwh),
        format_amount(inputs.full_tariff),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_a() -> (RawInvoiceReading, ContractTerms) {
        let reading = RawInvoiceReading {
            consumption_kwh: Some(2300.0),
            compensated_kwh: Some(200.0),
            prior_credits_kwh: Some(100.0),
            current_credits_kwh: Some(50.0),
            full_tariff: Some(1.1),
            discounted_tariff: Some(0.88),
            public_lighting_fee: Some(12.5),
            tariff_flag_fee: Some(0.0),
            other_charges: Some(40.0),
            reference_month: Some("03/2024".into()),
            distributor: None,
            state: None,
        };
        let terms = ContractTerms {
            contract_id: "CT-2024-001".into(),
            contracted_quota_kwh: Some(2000.0),
            discount_fraction: Some(0.2),
            include_public_lighting: true,
            include_tariff_flag: true,
            include_other_charges: false,
        };
        (reading, terms)
    }

    fn epoch() -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH
    }

    #[test]
    fn test_scenario_a_itemization() {
        let (reading, terms) = scenario_a();
        let bill = BillingReconciler::default().compute_bill_at(&reading, &terms, epoch()).unwrap();

        assert_eq!(bill.excess_kwh, 350.0);
        assert_eq!(bill.item(LineItemCode::Quota).unwrap().value, 1760.0);
        assert_eq!(bill.item(LineItemCode::Excess).unwrap().value, 385.0);
        assert!(bill.item(LineItemCode::Excess).unwrap().included);
        assert!(!bill.item(LineItemCode::OtherCharges).unwrap().included);
        assert_eq!(bill.total, 2157.5);
    }

    #[test]
    fn test_excluded_charges_stay_on_the_bill() {
        let (reading, mut terms) = scenario_a();
        terms.include_public_lighting = false;
        let bill = BillingReconciler::default().compute_bill_at(&reading, &terms, epoch()).unwrap();

        assert_eq!(bill.items.len(), 5);
        let lighting = bill.item(LineItemCode::PublicLighting).unwrap();
        assert_eq!(lighting.value, 12.5);
        assert!(!lighting.included);
        let other = bill.item(LineItemCode::OtherCharges).unwrap();
        assert_eq!(other.value, 40.0);
        assert!(!other.included);
        assert_eq!(bill.total, 2145.0);
    }

    #[test]
    fn test_scenario_a_metadata_and_summary() {
        let (reading, terms) = scenario_a();
        let bill = BillingReconciler::default().compute_bill_at(&reading, &terms, epoch()).unwrap();

        assert_eq!(bill.metadata.state, "SP");
        assert_eq!(bill.metadata.distributor, "ENEL SP");
        assert_eq!(bill.metadata.contract_id, "CT-2024-001");
        assert_eq!(bill.metadata.reference_month.as_deref(), Some("03/2024"));
        assert_eq!(bill.metadata.engine_version, ENGINE_VERSION);
        assert!(bill.summary.contains("2.000,00 kWh"));
        assert!(bill.summary.contains("R$ 0,88/kWh"));
        assert!(bill.summary.contains("2.300,00 kWh"));
        assert!(bill.summary.contains("150,00 kWh de créditos"));
        assert!(bill.summary.contains("R$ 1,10/kWh"));
    }

    #[test]
    fn test_scenario_b_missing_consumption() {
        let (mut reading, terms) = scenario_a();
        reading.consumption_kwh = None;
        let err = BillingReconciler::default().compute_bill(&reading, &terms).unwrap_err();
        assert_eq!(err.contract_id, "CT-2024-001");

        reading.consumption_kwh = Some(f64::NAN);
        assert!(BillingReconciler::default().compute_bill(&reading, &terms).is_err());
    }

    #[test]
    fn test_tariff_fallbacks() {
        let reading = RawInvoiceReading {
            consumption_kwh: Some(100.0),
            ..Default::default()
        };
        let terms = ContractTerms {
            contract_id: "C".into(),
            contracted_quota_kwh: Some(100.0),
            discount_fraction: Some(0.25),
            ..Default::default()
        };

        let inputs = BillingReconciler::default().normalize(&reading, &terms).unwrap();
        assert_eq!(inputs.full_tariff, 0.98);
        assert_eq!(inputs.discounted_tariff, 0.98 * 0.75);

        let regional = BillingReconciler::new(RegionDefaults {
            state: "RJ".into(),
            distributor: "Light".into(),
            full_tariff: 1.2,
        });
        let bill = regional.compute_bill_at(&reading, &terms, epoch()).unwrap();
        assert_eq!(bill.metadata.state, "RJ");
        assert_eq!(bill.item(LineItemCode::Quota).unwrap().value, 90.0);
    }

    #[test]
    fn test_reading_labels_override_region() {
        let (mut reading, terms) = scenario_a();
        reading.state = Some("MG".into());
        reading.distributor = Some("CEMIG".into());
        let bill = BillingReconciler::default().compute_bill_at(&reading, &terms, epoch()).unwrap();
        assert_eq!(bill.metadata.state, "MG");
        assert_eq!(bill.metadata.distributor, "CEMIG");
    }

    #[test]
    fn test_excess_never_negative() {
        let (mut reading, terms) = scenario_a();
        reading.consumption_kwh = Some(500.0);
        let bill = BillingReconciler::default().compute_bill_at(&reading, &terms, epoch()).unwrap();

        assert_eq!(bill.excess_kwh, 0.0);
        let excess = bill.item(LineItemCode::Excess).unwrap();
        assert_eq!(excess.value, 0.0);
        assert!(!excess.included);
    }

    #[test]
    fn test_total_invariant_and_excess_floor_over_grid() {
        let reconciler = BillingReconciler::default();
        let (base_reading, base_terms) = scenario_a();

        for consumption in [0.0, 150.0, 1999.9, 2300.0, 7777.77] {
            for quota in [0.0, 333.3, 2000.0] {
                for tariff in [None, Some(0.731), Some(1.1)] {
                    for flags in 0..8u8 {
                        let reading = RawInvoiceReading {
                            consumption_kwh: Some(consumption),
                            full_tariff: tariff,
                            discounted_tariff: None,
                            tariff_flag_fee: Some(7.333),
                            other_charges: Some(19.995),
                            ..base_reading.clone()
                        };
                        let terms = ContractTerms {
                            contracted_quota_kwh: Some(quota),
                            include_public_lighting: flags & 1 != 0,
                            include_tariff_flag: flags & 2 != 0,
                            include_other_charges: flags & 4 != 0,
                            ..base_terms.clone()
                        };

                        let bill = reconciler.compute_bill_at(&reading, &terms, epoch()).unwrap();
                        let expected = crate::numeric::round2(bill.included_items().map(|i| i.value).sum());
                        assert_eq!(bill.total, expected);
                        assert!(bill.excess_kwh >= 0.0);
                        for item in &bill.items {
                            assert_eq!(item.value, crate::numeric::round2(item.value));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_idempotent() {
        let (reading, terms) = scenario_a();
        let reconciler = BillingReconciler::default();
        let first = reconciler.compute_bill_at(&reading, &terms, epoch()).unwrap();
        let second = reconciler.compute_bill_at(&reading, &terms, epoch()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.total.to_bits(), second.total.to_bits());
    }
}
