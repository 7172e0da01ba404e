//! Sale error types.

use mostrador_shared::types::{MoneyError, ProductId, SaleId};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::ledger::LedgerError;

/// Errors that can occur while pricing, paying or voiding a sale.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SaleError {
    // ========== Validation Errors ==========
    /// A sale needs at least one item.
    #[error("La venta debe tener al menos un ítem")]
    EmptySale,

    /// Quantity must be positive and the merged total must fit a stock counter.
    #[error("Cantidad inválida para el producto {0}")]
    InvalidQuantity(ProductId),

    /// Invalid money input (price, discount, tendered amount).
    #[error("Monto inválido: {0}")]
    InvalidAmount(#[from] MoneyError),

    /// Discount larger than the amount it applies to.
    #[error("El descuento {discount} supera el importe {amount}")]
    DiscountExceedsAmount {
        /// Requested discount.
        discount: Decimal,
        /// Amount the discount applies to.
        amount: Decimal,
    },

    /// Tax rate outside 0..=100 percent.
    #[error("Alícuota de impuesto inválida: {0}")]
    InvalidTaxRate(Decimal),

    /// Mixed payment without any component.
    #[error("El pago mixto requiere al menos un componente")]
    MixedComponentsMissing,

    /// Non-cash components of a mixed payment exceed the sale total.
    #[error("Los componentes no efectivo ({components}) superan el total {total}")]
    MixedExceedsTotal {
        /// Sum of transfer, card and on-account components.
        components: Decimal,
        /// Sale total.
        total: Decimal,
    },

    /// Credit or account-credit sale without a customer.
    #[error("Las ventas a cuenta requieren un cliente")]
    CustomerRequired,

    /// Void reason missing.
    #[error("Debe indicar el motivo de la anulación")]
    VoidReasonRequired,

    // ========== Inventory Errors ==========
    /// Not enough stock.
    #[error("Stock insuficiente para {product_id}: solicitado {requested}, disponible {available}")]
    InsufficientStock {
        /// Product.
        product_id: ProductId,
        /// Requested quantity.
        requested: i32,
        /// Current stock.
        available: i32,
    },

    /// Product not found or inactive.
    #[error("Producto no encontrado: {0}")]
    ProductNotFound(ProductId),

    // ========== State Errors ==========
    /// Sale not found.
    #[error("Venta no encontrada: {0}")]
    SaleNotFound(SaleId),

    /// Sale belongs to another customer (or to nobody).
    #[error("La venta {0} no pertenece al cliente indicado")]
    CustomerMismatch(SaleId),

    /// Sale already voided.
    #[error("La venta {0} ya fue anulada")]
    AlreadyVoided(SaleId),

    /// Sale has nothing left to pay.
    #[error("La venta {0} no tiene saldo pendiente")]
    NothingDue(SaleId),

    /// Credit application larger than the sale's amount due.
    #[error("El monto {amount} excede el saldo de la venta {due}")]
    ExceedsAmountDue {
        /// Requested application.
        amount: Decimal,
        /// Amount still due on the sale.
        due: Decimal,
    },

    // ========== Ledger Errors ==========
    /// Customer ledger rejected the operation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl SaleError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptySale => "EMPTY_SALE",
            Self::InvalidQuantity(_) => "INVALID_QUANTITY",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::DiscountExceedsAmount { .. } => "DISCOUNT_EXCEEDS_AMOUNT",
            Self::InvalidTaxRate(_) => "INVALID_TAX_RATE",
            Self::MixedComponentsMissing => "MIXED_COMPONENTS_MISSING",
            Self::MixedExceedsTotal { .. } => "MIXED_EXCEEDS_TOTAL",
            Self::CustomerRequired => "CUSTOMER_REQUIRED",
            Self::VoidReasonRequired => "VOID_REASON_REQUIRED",
            Self::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            Self::ProductNotFound(_) => "PRODUCT_NOT_FOUND",
            Self::SaleNotFound(_) => "SALE_NOT_FOUND",
            Self::CustomerMismatch(_) => "SALE_CUSTOMER_MISMATCH",
            Self::AlreadyVoided(_) => "SALE_ALREADY_VOIDED",
            Self::NothingDue(_) => "NOTHING_DUE",
            Self::ExceedsAmountDue { .. } => "EXCEEDS_AMOUNT_DUE",
            Self::Ledger(e) => e.error_code(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::EmptySale
            | Self::InvalidQuantity(_)
            | Self::InvalidAmount(_)
            | Self::DiscountExceedsAmount { .. }
            | Self::InvalidTaxRate(_)
            | Self::MixedComponentsMissing
            | Self::MixedExceedsTotal { .. }
            | Self::CustomerRequired
            | Self::VoidReasonRequired => 400,

            Self::InsufficientStock { .. }
            | Self::CustomerMismatch(_)
            | Self::AlreadyVoided(_)
            | Self::NothingDue(_)
            | Self::ExceedsAmountDue { .. } => 422,

            Self::ProductNotFound(_) | Self::SaleNotFound(_) => 404,

            Self::Ledger(e) => e.http_status_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_ledger_errors_keep_their_code() {
        let err = SaleError::from(LedgerError::InsufficientCredit {
            requested: dec!(10),
            available: dec!(5),
        });
        assert_eq!(err.error_code(), "INSUFFICIENT_CREDIT");
        assert_eq!(err.http_status_code(), 422);
    }

    #[test]
    fn test_stock_error() {
        let err = SaleError::InsufficientStock {
            product_id: ProductId::new(),
            requested: 5,
            available: 2,
        };
        assert_eq!(err.error_code(), "INSUFFICIENT_STOCK");
        assert_eq!(err.http_status_code(), 422);
        assert!(err.to_string().contains("solicitado 5, disponible 2"));
    }
}
