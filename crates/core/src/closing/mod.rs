//! Cash register and daily closing engine.
//!
//! - Business-day clock with a configurable cutoff hour
//! - Expected cash and tolerance classification
//! - Per-method breakdown of daily totals
//! - Register state machine and pending-register detection

pub mod breakdown;
pub mod clock;
pub mod error;
pub mod reconcile;
pub mod register;

#[cfg(test)]
mod props;

pub use breakdown::MethodBreakdown;
pub use clock::{BusinessDayClock, BusinessDayWindow};
pub use error::ClosingError;
pub use reconcile::{CashCheck, CashStatus, ClosingFigures};
pub use register::{PendingRegister, PendingSeverity, RegisterState};
