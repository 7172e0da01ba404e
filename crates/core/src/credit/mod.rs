//! Balance/credit engine rules.
//!
//! Everything here is a pure decision over an [`AccountSnapshot`] or a slice
//! of ledger lines; persistence layers call these while holding the account
//! row lock.
//!
//! [`AccountSnapshot`]: crate::ledger::AccountSnapshot

pub mod policy;
pub mod report;
pub mod statement;

pub use policy::{
    CreditAvailability, CreditService, PaymentClassification, PaymentType,
};
pub use report::{AccountSummary, AgingBucket, AgingInput, AgingReport, AgingRow};
pub use statement::{LedgerLine, Statement, StatementTotals};
