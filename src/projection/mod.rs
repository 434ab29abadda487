//! Cash-flow and ROI projection for solar-purchase proposals

mod sale;
mod engine;
mod cashflows;

pub use sale::{SaleParameters, PaymentCondition, CashMode, InterestRate, MerchantRates};
pub use engine::{CashFlowProjector, compute_roi, MAX_HORIZON_MONTHS};
pub use cashflows::{Projection, MonthRow, ProjectionSummary};
