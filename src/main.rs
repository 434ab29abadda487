//! Solar Finance CLI
//!
//! Runs the billing reconciler or the cash-flow projector on JSON input files
//! and prints JSON to stdout.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;

use solar_finance::{
    billing::{ContractTerms, RawInvoiceReading},
    projection::{CashMode, InterestRate, PaymentCondition, SaleParameters},
    BillingReconciler, CashFlowProjector, EngineConfig, ScenarioRunner,
};

#[derive(Parser)]
#[command(name = "solar-finance", version, about = "Billing reconciliation and ROI projection")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Reconcile one invoice reading against a contract
    Bill {
        /// Invoice reading (JSON)
        #[arg(long)]
        reading: PathBuf,
        /// Contract terms (JSON)
        #[arg(long)]
        terms: PathBuf,
    },
    /// Project cash flow, payback and ROI for a sale
    Roi {
        /// Sale parameters (JSON)
        #[arg(long)]
        params: PathBuf,
        /// Also write the monthly series to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Compare the standard payment conditions for a sale
    Compare {
        /// Sale parameters (JSON); its own payment condition is ignored
        #[arg(long)]
        params: PathBuf,
        /// Number of card installments
        #[arg(long, default_value_t = 12)]
        installments: u32,
        /// Card rate, percent per month
        #[arg(long, default_value_t = 1.99)]
        card_rate: f64,
        /// Number of financing installments
        #[arg(long, default_value_t = 60)]
        financing: u32,
        /// Financing rate, percent per year
        #[arg(long, default_value_t = 24.0)]
        financing_rate: f64,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Bill { reading, terms } => run_bill(&reading, &terms),
        Command::Roi { params, csv } => run_roi(&params, csv.as_deref()),
        Command::Compare { params, installments, card_rate, financing, financing_rate } => {
            let conditions = [
                PaymentCondition::Cash { mode: CashMode::Pix },
                PaymentCondition::Cash { mode: CashMode::Credit },
                PaymentCondition::Installments {
                    count: installments,
                    card_rate: InterestRate::MonthlyPct(card_rate),
                },
                PaymentCondition::Financing {
                    count: financing,
                    down_payment: 0.0,
                    rate: InterestRate::AnnualPct(financing_rate),
                },
            ];
            run_compare(&params, &conditions)
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file)).with_context(|| format!("invalid JSON in {}", path.display()))
}

fn run_bill(reading_path: &Path, terms_path: &Path) -> Result<()> {
    let config = EngineConfig::from_env().context("invalid environment configuration")?;
    let reading: RawInvoiceReading = read_json(reading_path)?;
    let terms: ContractTerms = read_json(terms_path)?;

    let reconciler = BillingReconciler::new(config.region);
    let bill = reconciler.compute_bill(&reading, &terms)?;
    log::info!("contract {}: total {:.2}", bill.metadata.contract_id, bill.total);

    println!("{}", serde_json::to_string_pretty(&bill)?);
    Ok(())
}

fn run_roi(params_path: &Path, csv_path: Option<&Path>) -> Result<()> {
    let params: SaleParameters = read_json(params_path)?;
    let projection = CashFlowProjector::new().compute_roi(&params);

    if let Some(path) = csv_path {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("cannot create {}", path.display()))?;
        for row in projection.rows() {
            writer.serialize(row)?;
        }
        writer.flush()?;
        log::info!("wrote {} months to {}", projection.flow.len(), path.display());
    }

    println!("{}", serde_json::to_string_pretty(&projection.summary())?);
    Ok(())
}

fn run_compare(params_path: &Path, conditions: &[PaymentCondition]) -> Result<()> {
    let params: SaleParameters = read_json(params_path)?;
    let runner = ScenarioRunner::new();
    let outcomes = runner.compare(&params, conditions);

    if let Some(best) = runner.fastest_payback(&outcomes) {
        log::info!("fastest payback: {} at month {:?}", best.condition.label(), best.summary.payback);
    }

    println!("{}", serde_json::to_string_pretty(&outcomes)?);
    Ok(())
}
