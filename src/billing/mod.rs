//! Billing reconciliation for contracted energy quotas

mod reading;
mod bill;
mod reconciler;
pub mod loader;

pub use reading::{RawInvoiceReading, ContractTerms};
pub use bill::{Bill, BillMetadata, LineItem, LineItemCode};
pub use reconciler::{BillingReconciler, NormalizedInputs, ENGINE_VERSION};
