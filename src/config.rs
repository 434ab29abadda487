//! Environment-provided defaults
//!
//! Read once by the caller and handed to the engines; the engines never touch
//! the process environment.
//!
//! | Variable                    | Default   |
//! |-----------------------------|-----------|
//! | `SOLAR_DEFAULT_STATE`       | `SP`      |
//! | `SOLAR_DEFAULT_DISTRIBUTOR` | `ENEL SP` |
//! | `SOLAR_DEFAULT_FULL_TARIFF` | `0.98`    |

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::locale::parse_locale_number;

pub const ENV_STATE: &str = "SOLAR_DEFAULT_STATE";
pub const ENV_DISTRIBUTOR: &str = "SOLAR_DEFAULT_DISTRIBUTOR";
pub const ENV_FULL_TARIFF: &str = "SOLAR_DEFAULT_FULL_TARIFF";

/// Full tariff (currency/kWh) used when an invoice reading omits it
pub const DEFAULT_FULL_TARIFF: f64 = 0.98;
pub const DEFAULT_STATE: &str = "SP";
pub const DEFAULT_DISTRIBUTOR: &str = "ENEL SP";

/// Regional defaults substituted when a reading leaves a field out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionDefaults {
    pub state: String,
    pub distributor: String,
    pub full_tariff: f64,
}

impl Default for RegionDefaults {
    fn default() -> Self {
        Self {
            state: DEFAULT_STATE.to_string(),
            distributor: DEFAULT_DISTRIBUTOR.to_string(),
            full_tariff: DEFAULT_FULL_TARIFF,
        }
    }
}

/// Top-level engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub region: RegionDefaults,
}

impl EngineConfig {
    /// Load from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary key lookup. Blank values keep the default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut region = RegionDefaults::default();

        if let Some(state) = non_blank(&lookup, ENV_STATE) {
            region.state = state;
        }
        if let Some(distributor) = non_blank(&lookup, ENV_DISTRIBUTOR) {
            region.distributor = distributor;
        }
        if let Some(raw) = non_blank(&lookup, ENV_FULL_TARIFF) {
            region.full_tariff = parse_tariff(&raw)?;
        }

        log::debug!(
            "region defaults: state={} distributor={} full_tariff={}",
            region.state, region.distributor, region.full_tariff
        );

        Ok(Self { region })
    }
}

fn non_blank<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(key)?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        log::warn!("{} is set but blank; using default", key);
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Accepts both `0.98` and `0,98`
fn parse_tariff(raw: &str) -> Result<f64, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidValue {
        key: ENV_FULL_TARIFF.to_string(),
        value: raw.to_string(),
        reason: reason.to_string(),
    };

    let parsed = if raw.contains(',') {
        parse_locale_number(raw)
    } else {
        raw.parse::<f64>().ok().filter(|v| v.is_finite())
    };
    let value = parsed.ok_or_else(|| invalid("not a number"))?;

    if value < 0.0 {
        return Err(invalid("tariff cannot be negative"));
    }
    Ok(value)
}
