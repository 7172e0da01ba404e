//! Cash register error types.

use chrono::{NaiveDate, NaiveDateTime};
use mostrador_shared::config::RegisterConfigError;
use mostrador_shared::types::{CashClosingId, MoneyError};
use thiserror::Error;

/// Errors that can occur while opening, closing or finalizing a register.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClosingError {
    // ========== Validation Errors ==========
    /// Invalid money input.
    #[error("Monto inválido: {0}")]
    InvalidAmount(#[from] MoneyError),

    /// Register settings are invalid.
    #[error("Configuración de caja inválida: {0}")]
    Config(#[from] RegisterConfigError),

    /// Local time that does not exist in the configured timezone.
    #[error("Hora local inexistente: {0}")]
    NonexistentLocalTime(NaiveDateTime),

    // ========== State Errors ==========
    /// Another date still has an unfinalized register.
    #[error("Ya existe una caja abierta sin finalizar para el {0}")]
    RegisterAlreadyOpen(NaiveDate),

    /// This date already has a closing record.
    #[error("Ya existe un cierre de caja para el {0}")]
    ClosingAlreadyExists(NaiveDate),

    /// No register was opened for this date.
    #[error("No hay caja abierta para el {0}")]
    RegisterNotOpen(NaiveDate),

    /// Closing must be recorded before finalizing.
    #[error("La caja del {0} debe cerrarse antes de finalizarla")]
    NotClosed(NaiveDate),

    /// Closing is finalized and immutable.
    #[error("El cierre del {0} ya está finalizado")]
    AlreadyFinalized(NaiveDate),

    // ========== Lookup Errors ==========
    /// Closing not found.
    #[error("Cierre de caja no encontrado: {0}")]
    ClosingNotFound(CashClosingId),
}

impl ClosingError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::Config(_) => "INVALID_REGISTER_CONFIG",
            Self::NonexistentLocalTime(_) => "NONEXISTENT_LOCAL_TIME",
            Self::RegisterAlreadyOpen(_) => "REGISTER_ALREADY_OPEN",
            Self::ClosingAlreadyExists(_) => "CLOSING_ALREADY_EXISTS",
            Self::RegisterNotOpen(_) => "REGISTER_NOT_OPEN",
            Self::NotClosed(_) => "REGISTER_NOT_CLOSED",
            Self::AlreadyFinalized(_) => "CLOSING_ALREADY_FINALIZED",
            Self::ClosingNotFound(_) => "CLOSING_NOT_FOUND",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidAmount(_) => 400,
            Self::RegisterAlreadyOpen(_) | Self::ClosingAlreadyExists(_) => 409,
            Self::RegisterNotOpen(_) | Self::NotClosed(_) | Self::AlreadyFinalized(_) => 422,
            Self::ClosingNotFound(_) => 404,
            Self::Config(_) | Self::NonexistentLocalTime(_) => 500,
        }
    }
}
