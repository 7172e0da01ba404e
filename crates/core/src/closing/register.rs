//! Register state machine and pending-register detection.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::clock::BusinessDayClock;
use super::error::ClosingError;

/// State of a day's register: `opened -> draft_closed -> finalized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegisterState {
    /// Opened, no closing recorded yet.
    Opened,
    /// Closing recorded, still editable.
    DraftClosed,
    /// Frozen.
    Finalized,
}

impl RegisterState {
    /// Derives the state from stored flags.
    #[must_use]
    pub const fn from_flags(is_closed: bool, is_finalized: bool) -> Self {
        if is_finalized {
            Self::Finalized
        } else if is_closed {
            Self::DraftClosed
        } else {
            Self::Opened
        }
    }

    /// Checks that a register may be opened for `date`.
    ///
    /// `existing` is this date's register, `unfinalized` the date of any
    /// register still not finalized.
    pub fn ensure_can_open(
        date: NaiveDate,
        existing: Option<Self>,
        unfinalized: Option<NaiveDate>,
    ) -> Result<(), ClosingError> {
        if existing.is_some() {
            return Err(ClosingError::ClosingAlreadyExists(date));
        }
        if let Some(open_date) = unfinalized {
            return Err(ClosingError::RegisterAlreadyOpen(open_date));
        }
        Ok(())
    }

    /// Checks that a closing may be recorded (or re-recorded while draft).
    pub fn ensure_can_close(self, date: NaiveDate) -> Result<(), ClosingError> {
        match self {
            Self::Opened | Self::DraftClosed => Ok(()),
            Self::Finalized => Err(ClosingError::AlreadyFinalized(date)),
        }
    }

    /// Checks that the closing may be finalized.
    pub fn ensure_can_finalize(self, date: NaiveDate) -> Result<(), ClosingError> {
        match self {
            Self::DraftClosed => Ok(()),
            Self::Opened => Err(ClosingError::NotClosed(date)),
            Self::Finalized => Err(ClosingError::AlreadyFinalized(date)),
        }
    }
}

/// Severity of an unfinalized register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PendingSeverity {
    /// Nothing pending.
    None,
    /// Today's register is open; normal during the day.
    Info,
    /// A previous day was never finalized.
    High,
}

/// Whether some date has an unfinalized register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRegister {
    /// An unfinalized register exists.
    pub has_pending: bool,
    /// Its business date.
    pub closing_date: Option<NaiveDate>,
    /// Its state.
    pub state: Option<RegisterState>,
    /// Business days between that date and today.
    pub days_pending: i64,
    /// Severity tier.
    pub severity: PendingSeverity,
    /// Always false: a pending register is a warning, not a gate on sales.
    pub blocks_sales: bool,
    /// Operator message.
    pub message: String,
}

impl PendingRegister {
    /// Assesses the unfinalized register, if any, as of `now`.
    #[must_use]
    pub fn assess(
        clock: &BusinessDayClock,
        pending: Option<(NaiveDate, RegisterState)>,
        now: DateTime<Utc>,
    ) -> Self {
        let Some((date, state)) = pending else {
            return Self {
                has_pending: false,
                closing_date: None,
                state: None,
                days_pending: 0,
                severity: PendingSeverity::None,
                blocks_sales: false,
                message: "No hay cajas pendientes".to_string(),
            };
        };

        let days_pending = clock.days_since(date, now).max(0);
        let (severity, message) = if days_pending >= 1 {
            (
                PendingSeverity::High,
                format!("La caja del {date} lleva {days_pending} día(s) sin finalizar"),
            )
        } else {
            (PendingSeverity::Info, format!("Caja del {date} abierta"))
        };

        Self {
            has_pending: true,
            closing_date: Some(date),
            state: Some(state),
            days_pending,
            severity,
            blocks_sales: false,
            message,
        }
    }
}
