//! Error to JSON response mapping.
//!
//! Every repository error already knows its code and status; handlers only
//! convert with `?` and the body is always `{ "error", "message" }`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mostrador_db::repositories::{
    CashClosingError, CustomerAccountError, ExpenseError, SaleRepoError,
};
use mostrador_shared::AppError;
use serde_json::json;
use tracing::error;

/// An error ready to be sent to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status.
    pub status: StatusCode,
    /// Stable machine-readable code.
    pub code: &'static str,
    /// Operator-facing message.
    pub message: String,
}

impl ApiError {
    fn new(status: u16, code: &'static str, message: String) -> Self {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(code, error = %message, "Request failed");
            return Self {
                status,
                code,
                message: "Ocurrió un error interno".to_string(),
            };
        }
        Self {
            status,
            code,
            message,
        }
    }

    /// A 400 for malformed query or body values.
    #[must_use]
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(400, code, message.into())
    }

    /// A 404 for lookups that found nothing.
    #[must_use]
    pub fn not_found(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(404, code, message.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({
                "error": self.code,
                "message": self.message,
            })),
        )
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::new(err.status_code(), err.error_code(), err.to_string())
    }
}

macro_rules! from_repo_error {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for ApiError {
                fn from(err: $ty) -> Self {
                    Self::new(err.http_status_code(), err.error_code(), err.to_string())
                }
            }
        )*
    };
}

from_repo_error!(
    CustomerAccountError,
    SaleRepoError,
    CashClosingError,
    ExpenseError,
);

/// Result alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use mostrador_core::closing::ClosingError;
    use mostrador_core::ledger::LedgerError;
    use mostrador_core::sales::SaleError;
    use rust_decimal_macros::dec;
    use sea_orm::DbErr;

    #[test]
    fn test_validation_error_keeps_message() {
        let err = ApiError::from(SaleRepoError::from(SaleError::EmptySale));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, "EMPTY_SALE");
        assert_eq!(err.message, "La venta debe tener al menos un ítem");
    }

    #[test]
    fn test_credit_errors_map_through() {
        let err = ApiError::from(CustomerAccountError::from(LedgerError::InsufficientCredit {
            requested: dec!(50),
            available: dec!(10),
        }));
        assert_eq!(err.code, "INSUFFICIENT_CREDIT");
        assert!(err.status.is_client_error());
    }

    #[test]
    fn test_conflict_on_open_register() {
        let date = chrono::NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        let err = ApiError::from(CashClosingError::from(ClosingError::RegisterAlreadyOpen(date)));
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(err.code, "REGISTER_ALREADY_OPEN");
    }

    #[test]
    fn test_database_errors_are_hidden() {
        let err = ApiError::from(SaleRepoError::from(DbErr::Custom("connection reset".into())));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code, "DATABASE_ERROR");
        assert!(!err.message.contains("connection reset"));
    }

    #[test]
    fn test_unauthorized_from_app_error() {
        let err = ApiError::from(AppError::Unauthorized("falta x-actor-id".into()));
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.code, "UNAUTHORIZED");
    }
}
