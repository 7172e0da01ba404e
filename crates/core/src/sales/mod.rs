//! Sales and payment rules.
//!
//! - Line pricing with discounts and tax
//! - Payment planning for single and mixed methods
//! - Payment status derivation
//! - Ledger reversal of voided sales

pub mod error;
pub mod method;
pub mod payment;
pub mod pricing;
pub mod status;
pub mod void;

#[cfg(test)]
mod props;

pub use error::SaleError;
pub use method::PaymentMethod;
pub use payment::{MixedComponents, PaymentPlan, PaymentRequest, PlannedPayment, plan_payment};
pub use pricing::{PricedLine, PricedSale, SaleLineInput, price_sale};
pub use status::{PaymentStatus, amount_due, validate_credit_to_sale};
pub use void::{SalePayment, VoidReversal};
