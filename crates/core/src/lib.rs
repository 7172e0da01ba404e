//! Core business logic for Mostrador.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Customer ledger polarity, account aggregate and posting
//! - `credit` - Payment classification, credit policy, statements and aging
//! - `sales` - Sale pricing, payment planning, status derivation and voids
//! - `closing` - Business-day clock and daily cash reconciliation

pub mod closing;
pub mod credit;
pub mod ledger;
pub mod sales;
