//! Error types
//!
//! The engines themselves have exactly one failure mode, a reading without
//! consumption. The other errors belong to configuration and file adapters.

use thiserror::Error;

/// The invoice reading carries no usable consumption figure.
///
/// Raised before any line item is built. Retrying with the same reading cannot succeed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invoice reading for contract '{contract_id}' has no consumption (kWh) value")]
pub struct MissingConsumptionError {
    pub contract_id: String,
}

/// Invalid environment-provided default
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// Failure reading input files for the CLI and batch tools
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("CSV error: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}
