//! Shared types, errors, and configuration for Mostrador.
//!
//! This crate provides common types used across all other crates:
//! - Money helpers with fixed two-decimal precision
//! - Typed IDs for type-safe entity references
//! - Pagination types for list endpoints
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, RegisterConfig};
pub use error::{AppError, AppResult};
