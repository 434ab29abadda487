//! Solar Finance - numeric core for solar energy contracts and proposals
//!
//! This library provides:
//! - Billing reconciliation of a parsed energy invoice against a contracted quota
//! - Month-by-month cash-flow projection with payback, ROI, NPV and IRR
//! - Cash, card-installment and financed payment schedules
//! - Decimal-comma number parsing and formatting
//!
//! Both engines are pure: no I/O, no shared state, fresh output per call.

pub mod numeric;
pub mod locale;
pub mod config;
pub mod error;
pub mod billing;
pub mod projection;
pub mod scenario;

// Re-export commonly used types
pub use billing::{BillingReconciler, Bill, LineItem, RawInvoiceReading, ContractTerms};
pub use projection::{CashFlowProjector, Projection, SaleParameters, PaymentCondition};
pub use locale::{parse_locale_number, format_locale_number};
pub use config::{EngineConfig, RegionDefaults};
pub use error::MissingConsumptionError;
pub use scenario::ScenarioRunner;
