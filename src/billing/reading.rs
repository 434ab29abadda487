//! Billing inputs: one parsed invoice reading and one contract's commercial terms

use serde::{Deserialize, Serialize};

use crate::locale::serde_number;

/// Structured fields extracted from an energy invoice by the OCR parser
///
/// Only `consumption_kwh` is required by the reconciler; every other amount
/// defaults to zero (or to the regional default, for the full tariff).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawInvoiceReading {
    /// Energy consumed in the period (kWh)
    #[serde(default, deserialize_with = "serde_number::optional")]
    pub consumption_kwh: Option<f64>,

    /// Energy compensated by the distributor (kWh)
    #[serde(default, deserialize_with = "serde_number::optional")]
    pub compensated_kwh: Option<f64>,

    /// Credit balance carried from previous periods (kWh)
    #[serde(default, deserialize_with = "serde_number::optional")]
    pub prior_credits_kwh: Option<f64>,

    /// Credits generated in the current period (kWh)
    #[serde(default, deserialize_with = "serde_number::optional")]
    pub current_credits_kwh: Option<f64>,

    /// Full tariff (currency/kWh)
    #[serde(default, deserialize_with = "serde_number::optional")]
    pub full_tariff: Option<f64>,

    /// Discounted floor tariff printed on the invoice (currency/kWh)
    #[serde(default, deserialize_with = "serde_number::optional")]
    pub discounted_tariff: Option<f64>,

    /// Public-lighting contribution (CIP)
    #[serde(default, deserialize_with = "serde_number::optional")]
    pub public_lighting_fee: Option<f64>,

    /// Tariff-flag surcharge (bandeira)
    #[serde(default, deserialize_with = "serde_number::optional")]
    pub tariff_flag_fee: Option<f64>,

    #[serde(default, deserialize_with = "serde_number::optional")]
    pub other_charges: Option<f64>,

    /// Reference month as printed, e.g. `"03/2024"`
    #[serde(default)]
    pub reference_month: Option<String>,

    #[serde(default)]
    pub distributor: Option<String>,

    #[serde(default)]
    pub state: Option<String>,
}

/// Commercial terms of one active contract
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractTerms {
    pub contract_id: String,

    /// Contracted energy quota per month, Kc (kWh)
    #[serde(default)]
    pub contracted_quota_kwh: Option<f64>,

    /// Discount off the full tariff as a fraction (0.2 = 20%)
    #[serde(default)]
    pub discount_fraction: Option<f64>,

    #[serde(default)]
    pub include_public_lighting: bool,

    #[serde(default)]
    pub include_tariff_flag: bool,

    #[serde(default)]
    pub include_other_charges: bool,
}
