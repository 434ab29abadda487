//! Load invoice readings and contract terms from files
//!
//! File adapter for the CLI and batch tools. The reconciler itself never does I/O.
//!
//! Readings CSV columns (all optional except `contract_id`):
//! `contract_id,consumption_kwh,compensated_kwh,prior_credits_kwh,current_credits_kwh,
//! full_tariff,discounted_tariff,public_lighting_fee,tariff_flag_fee,other_charges,
//! reference_month,distributor,state`. Amounts are always read as decimal-comma
//! text, so `2.300` is 2300 kWh and `1,10` is 1.10.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use csv::Reader;
use serde::Deserialize;

use crate::error::LoadError;
use crate::locale::serde_number;
use super::reading::{ContractTerms, RawInvoiceReading};

/// Raw CSV row: the reading plus the contract it belongs to
#[derive(Debug, Deserialize)]
struct CsvRow {
    contract_id: String,
    #[serde(default, deserialize_with = "serde_number::optional_text")]
    consumption_kwh: Option<f64>,
    #[serde(default, deserialize_with = "serde_number::optional_text")]
    compensated_kwh: Option<f64>,
    #[serde(default, deserialize_with = "serde_number::optional_text")]
    prior_credits_kwh: Option<f64>,
    #[serde(default, deserialize_with = "serde_number::optional_text")]
    current_credits_kwh: Option<f64>,
    #[serde(default, deserialize_with = "serde_number::optional_text")]
    full_tariff: Option<f64>,
    #[serde(default, deserialize_with = "serde_number::optional_text")]
    discounted_tariff: Option<f64>,
    #[serde(default, deserialize_with = "serde_number::optional_text")]
    public_lighting_fee: Option<f64>,
    #[serde(default, deserialize_with = "serde_number::optional_text")]
    tariff_flag_fee: Option<f64>,
    #[serde(default, deserialize_with = "serde_number::optional_text")]
    other_charges: Option<f64>,
    #[serde(default)]
    reference_month: Option<String>,
    #[serde(default)]
    distributor: Option<String>,
    #[serde(default)]
    state: Option<String>,
}

impl CsvRow {
    fn into_reading(self) -> (String, RawInvoiceReading) {
        let reading = RawInvoiceReading {
            consumption_kwh: self.consumption_kwh,
            compensated_kwh: self.compensated_kwh,
            prior_credits_kwh: self.prior_credits_kwh,
            current_credits_kwh: self.current_credits_kwh,
            full_tariff: self.full_tariff,
            discounted_tariff: self.discounted_tariff,
            public_lighting_fee: self.public_lighting_fee,
            tariff_flag_fee: self.tariff_flag_fee,
            other_charges: self.other_charges,
            reference_month: blank_to_none(self.reference_month),
            distributor: blank_to_none(self.distributor),
            state: blank_to_none(self.state),
        };
        (self.contract_id, reading)
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Load `(contract_id, reading)` pairs from a CSV file
pub fn load_readings<P: AsRef<Path>>(path: P) -> Result<Vec<(String, RawInvoiceReading)>, LoadError> {
    let file = std::fs::File::open(path)?;
    load_readings_from_reader(file)
}

/// Load `(contract_id, reading)` pairs from any CSV source
pub fn load_readings_from_reader<R: Read>(reader: R) -> Result<Vec<(String, RawInvoiceReading)>, LoadError> {
    let mut reader = Reader::from_reader(reader);
    let mut readings = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        readings.push(row.into_reading());
    }

    log::debug!("loaded {} invoice readings", readings.len());
    Ok(readings)
}

/// Load contract terms from a JSON array, keyed by contract id
pub fn load_terms<P: AsRef<Path>>(path: P) -> Result<HashMap<String, ContractTerms>, LoadError> {
    let file = std::fs::File::open(path)?;
    let terms: Vec<ContractTerms> = serde_json::from_reader(std::io::BufReader::new(file))?;
    Ok(terms.into_iter().map(|t| (t.contract_id.clone(), t)).collect())
}
