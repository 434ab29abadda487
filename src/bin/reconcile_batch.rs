//! Reconcile a CSV of invoice readings against their contracts
//!
//! Outputs one row per reading with the itemized values and total.
//! Readings whose contract is unknown or that lack consumption are reported and skipped.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use rayon::prelude::*;
use serde::Serialize;

use solar_finance::billing::{loader, Bill, BillingReconciler, LineItemCode};
use solar_finance::EngineConfig;

#[derive(Parser)]
#[command(name = "reconcile_batch", about = "Batch billing reconciliation")]
struct Args {
    /// Invoice readings CSV (one row per reading, keyed by contract_id)
    #[arg(long)]
    readings: PathBuf,
    /// Contract terms, JSON array
    #[arg(long)]
    terms: PathBuf,
    /// Output CSV
    #[arg(long, default_value = "bills.csv")]
    output: PathBuf,
}

/// Flattened bill for CSV output
#[derive(Debug, Serialize)]
struct BillRow {
    contract_id: String,
    reference_month: String,
    state: String,
    distributor: String,
    excess_kwh: f64,
    quota: f64,
    excess: f64,
    public_lighting: f64,
    tariff_flag: f64,
    other_charges: f64,
    total: f64,
}

impl BillRow {
    fn from_bill(bill: &Bill) -> Self {
        // Excluded items are reported as zero so the row sums to the total
        let value = |code| {
            bill.item(code)
                .filter(|i| i.included)
                .map(|i| i.value)
                .unwrap_or(0.0)
        };
        Self {
            contract_id: bill.metadata.contract_id.clone(),
            reference_month: bill.metadata.reference_month.clone().unwrap_or_default(),
            state: bill.metadata.state.clone(),
            distributor: bill.metadata.distributor.clone(),
            excess_kwh: bill.excess_kwh,
            quota: value(LineItemCode::Quota),
            excess: value(LineItemCode::Excess),
            public_lighting: value(LineItemCode::PublicLighting),
            tariff_flag: value(LineItemCode::TariffFlag),
            other_charges: value(LineItemCode::OtherCharges),
            total: bill.total,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();
    let config = EngineConfig::from_env().context("invalid environment configuration")?;
    let readings = loader::load_readings(&args.readings)
        .with_context(|| format!("cannot load readings from {}", args.readings.display()))?;
    let terms = loader::load_terms(&args.terms)
        .with_context(|| format!("cannot load terms from {}", args.terms.display()))?;
    println!("Loaded {} readings and {} contracts in {:?}", readings.len(), terms.len(), start.elapsed());

    let reconciler = BillingReconciler::new(config.region);
    let computed_at = Utc::now();

    let results: Vec<Result<Bill, String>> = readings
        .par_iter()
        .map(|(contract_id, reading)| {
            let contract = terms
                .get(contract_id)
                .ok_or_else(|| format!("unknown contract '{}'", contract_id))?;
            reconciler
                .compute_bill_at(reading, contract, computed_at)
                .map_err(|e| e.to_string())
        })
        .collect();

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("cannot create {}", args.output.display()))?;
    let mut written = 0usize;
    let mut grand_total = 0.0;
    for result in &results {
        match result {
            Ok(bill) => {
                writer.serialize(BillRow::from_bill(bill))?;
                grand_total += bill.total;
                written += 1;
            }
            Err(message) => log::warn!("skipped reading: {}", message),
        }
    }
    writer.flush()?;

    println!(
        "Wrote {} bills ({} skipped) to {}; grand total {:.2}",
        written,
        results.len() - written,
        args.output.display(),
        grand_total
    );
    Ok(())
}
