//! Ledger error types for validation and state errors.
//!
//! Covers amount validation, credit policy (insufficient credit, overpayment,
//! blocked or inactive accounts, credit limit) and account lookup.

use chrono::{DateTime, Utc};
use mostrador_shared::types::{CustomerId, MoneyError};
use rust_decimal::Decimal;
use thiserror::Error;

use super::kind::TransactionKind;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Amount is not a positive value with at most two decimals.
    #[error("Monto inválido: {0}")]
    InvalidAmount(#[from] MoneyError),

    /// Credit limit cannot be negative.
    #[error("El límite de crédito no puede ser negativo")]
    NegativeCreditLimit,

    /// Block end must lie in the future.
    #[error("La fecha de bloqueo debe ser futura")]
    BlockInPast,

    /// Method cannot settle a standalone payment (credit, account credit).
    #[error("Medio de pago no admitido para cobros: {0}")]
    UnsupportedPaymentMethod(String),

    /// A note is required to explain an advance payment.
    #[error("Un pago anticipado requiere una nota que explique su destino")]
    AdvanceNoteRequired,

    /// Kind is posted by the sale workflow and cannot be entered by hand.
    #[error("El tipo de movimiento {0} solo se registra desde una venta")]
    SaleManagedKind(TransactionKind),

    // ========== Credit Policy Errors ==========
    /// The customer's credit does not cover the requested application.
    #[error("Crédito insuficiente: solicitado {requested}, disponible {available}")]
    InsufficientCredit {
        /// Amount the caller tried to apply.
        requested: Decimal,
        /// Credit available to the sale.
        available: Decimal,
    },

    /// Payment exceeds the outstanding debt and overpayment was not allowed.
    #[error("El monto {amount} excede la deuda pendiente de {debt}")]
    ExceedsDebt {
        /// Payment amount.
        amount: Decimal,
        /// Outstanding debt.
        debt: Decimal,
    },

    /// Payment against an account without debt, overpayment not allowed.
    #[error("El cliente no tiene saldo pendiente")]
    NoOutstandingBalance,

    /// Account is deactivated.
    #[error("La cuenta del cliente {0} está inactiva")]
    AccountInactive(CustomerId),

    /// Account is temporarily blocked.
    #[error("La cuenta del cliente {customer_id} está bloqueada hasta {until}")]
    AccountBlocked {
        /// Customer whose account is blocked.
        customer_id: CustomerId,
        /// End of the block.
        until: DateTime<Utc>,
    },

    /// The operation would take the balance over the configured limit.
    #[error("Límite de crédito excedido: saldo resultante {projected}, límite {limit}")]
    CreditLimitExceeded {
        /// Balance after the operation.
        projected: Decimal,
        /// Configured credit limit.
        limit: Decimal,
    },

    // ========== Lookup Errors ==========
    /// Customer not found.
    #[error("Cliente no encontrado: {0}")]
    CustomerNotFound(CustomerId),

    /// Customer exists but has no account row.
    #[error("Cuenta corriente no encontrada para el cliente {0}")]
    AccountNotFound(CustomerId),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::NegativeCreditLimit => "NEGATIVE_CREDIT_LIMIT",
            Self::BlockInPast => "BLOCK_IN_PAST",
            Self::UnsupportedPaymentMethod(_) => "UNSUPPORTED_PAYMENT_METHOD",
            Self::AdvanceNoteRequired => "ADVANCE_NOTE_REQUIRED",
            Self::SaleManagedKind(_) => "SALE_MANAGED_TRANSACTION_TYPE",
            Self::InsufficientCredit { .. } => "INSUFFICIENT_CREDIT",
            Self::ExceedsDebt { .. } => "EXCEEDS_DEBT",
            Self::NoOutstandingBalance => "NO_OUTSTANDING_BALANCE",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
            Self::AccountBlocked { .. } => "ACCOUNT_BLOCKED",
            Self::CreditLimitExceeded { .. } => "CREDIT_LIMIT_EXCEEDED",
            Self::CustomerNotFound(_) => "CUSTOMER_NOT_FOUND",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - malformed input
            Self::InvalidAmount(_)
            | Self::NegativeCreditLimit
            | Self::BlockInPast
            | Self::UnsupportedPaymentMethod(_)
            | Self::AdvanceNoteRequired
            | Self::SaleManagedKind(_) => 400,

            // 422 Unprocessable - credit policy
            Self::InsufficientCredit { .. }
            | Self::ExceedsDebt { .. }
            | Self::NoOutstandingBalance
            | Self::AccountInactive(_)
            | Self::AccountBlocked { .. }
            | Self::CreditLimitExceeded { .. } => 422,

            // 404 Not Found
            Self::CustomerNotFound(_) | Self::AccountNotFound(_) => 404,
        }
    }
}
