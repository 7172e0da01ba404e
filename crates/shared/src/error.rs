//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Coarse error categories shared by every layer.
///
/// Domain errors in `mostrador-core` and `mostrador-db` carry their own codes;
/// this type is what they collapse into once they leave the service layer.
#[derive(Debug, Error)]
pub enum AppError {
    /// The acting user could not be identified.
    #[error("Usuario no identificado: {0}")]
    Unauthorized(String),

    /// Resource not found.
    #[error("No encontrado: {0}")]
    NotFound(String),

    /// Malformed or out-of-range input.
    #[error("Dato inválido: {0}")]
    Validation(String),

    /// Business rule violation (insufficient credit, finalized closing, ...).
    #[error("Operación rechazada: {0}")]
    BusinessRule(String),

    /// Conflict with existing state (duplicate closing, open register).
    #[error("Conflicto: {0}")]
    Conflict(String),

    /// Database error.
    #[error("Error de base de datos: {0}")]
    Database(String),

    /// Internal server error.
    #[error("Error interno: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized(_) => 401,
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::BusinessRule(_) => 422,
            Self::Conflict(_) => 409,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::BusinessRule(_) => "BUSINESS_RULE_VIOLATION",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true for errors the operator can fix by changing the request.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}
