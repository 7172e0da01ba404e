//! Customer accounts-receivable ledger.
//!
//! This module implements the core ledger functionality:
//! - Transaction kinds and their balance polarity
//! - The customer account aggregate and its derived flags
//! - Posting of ledger events with running balances
//! - Error types for ledger and credit-policy operations

pub mod account;
pub mod error;
pub mod kind;
pub mod service;

#[cfg(test)]
mod props;

pub use account::{AccountSnapshot, Posting, assume_utc};
pub use error::LedgerError;
pub use kind::{Polarity, TransactionKind};
pub use service::{LedgerEvent, LedgerService, Reference, ReferenceType};
