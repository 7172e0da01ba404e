//! `SeaORM` active enums mapped to PostgreSQL enum types.

use mostrador_core::ledger::TransactionKind;
use mostrador_core::sales::{PaymentMethod as CorePaymentMethod, PaymentStatus as CorePaymentStatus};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// `transaction_type` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_type")]
pub enum TransactionType {
    /// Sale.
    #[sea_orm(string_value = "sale")]
    Sale,
    /// Payment.
    #[sea_orm(string_value = "payment")]
    Payment,
    /// Credit note.
    #[sea_orm(string_value = "credit_note")]
    CreditNote,
    /// Debit note.
    #[sea_orm(string_value = "debit_note")]
    DebitNote,
    /// Credit application.
    #[sea_orm(string_value = "credit_application")]
    CreditApplication,
    /// Opening balance.
    #[sea_orm(string_value = "opening_balance")]
    OpeningBalance,
    /// Adjustment.
    #[sea_orm(string_value = "adjustment")]
    Adjustment,
    /// Repair deposit.
    #[sea_orm(string_value = "repair_deposit")]
    RepairDeposit,
    /// Void of a sale.
    #[sea_orm(string_value = "void_sale")]
    VoidSale,
}

impl From<TransactionKind> for TransactionType {
    fn from(kind: TransactionKind) -> Self {
        match kind {
            TransactionKind::Sale => Self::Sale,
            TransactionKind::Payment => Self::Payment,
            TransactionKind::CreditNote => Self::CreditNote,
            TransactionKind::DebitNote => Self::DebitNote,
            TransactionKind::CreditApplication => Self::CreditApplication,
            TransactionKind::OpeningBalance => Self::OpeningBalance,
            TransactionKind::Adjustment => Self::Adjustment,
            TransactionKind::RepairDeposit => Self::RepairDeposit,
            TransactionKind::VoidSale => Self::VoidSale,
        }
    }
}

impl From<TransactionType> for TransactionKind {
    fn from(value: TransactionType) -> Self {
        match value {
            TransactionType::Sale => Self::Sale,
            TransactionType::Payment => Self::Payment,
            TransactionType::CreditNote => Self::CreditNote,
            TransactionType::DebitNote => Self::DebitNote,
            TransactionType::CreditApplication => Self::CreditApplication,
            TransactionType::OpeningBalance => Self::OpeningBalance,
            TransactionType::Adjustment => Self::Adjustment,
            TransactionType::RepairDeposit => Self::RepairDeposit,
            TransactionType::VoidSale => Self::VoidSale,
        }
    }
}

/// `payment_method` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_method")]
pub enum PaymentMethod {
    /// Cash.
    #[sea_orm(string_value = "cash")]
    Cash,
    /// Transfer.
    #[sea_orm(string_value = "transfer")]
    Transfer,
    /// Card.
    #[sea_orm(string_value = "card")]
    Card,
    /// Mixed.
    #[sea_orm(string_value = "mixed")]
    Mixed,
    /// On account.
    #[sea_orm(string_value = "credit")]
    Credit,
    /// Prepaid credit.
    #[sea_orm(string_value = "account_credit")]
    AccountCredit,
}

impl From<CorePaymentMethod> for PaymentMethod {
    fn from(method: CorePaymentMethod) -> Self {
        match method {
            CorePaymentMethod::Cash => Self::Cash,
            CorePaymentMethod::Transfer => Self::Transfer,
            CorePaymentMethod::Card => Self::Card,
            CorePaymentMethod::Mixed => Self::Mixed,
            CorePaymentMethod::Credit => Self::Credit,
            CorePaymentMethod::AccountCredit => Self::AccountCredit,
        }
    }
}

impl From<PaymentMethod> for CorePaymentMethod {
    fn from(method: PaymentMethod) -> Self {
        match method {
            PaymentMethod::Cash => Self::Cash,
            PaymentMethod::Transfer => Self::Transfer,
            PaymentMethod::Card => Self::Card,
            PaymentMethod::Mixed => Self::Mixed,
            PaymentMethod::Credit => Self::Credit,
            PaymentMethod::AccountCredit => Self::AccountCredit,
        }
    }
}

/// `payment_status` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_status")]
pub enum PaymentStatus {
    /// Nothing paid.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Partly paid.
    #[sea_orm(string_value = "partial")]
    Partial,
    /// Fully paid.
    #[sea_orm(string_value = "paid")]
    Paid,
    /// Voided.
    #[sea_orm(string_value = "voided")]
    Voided,
}

impl From<CorePaymentStatus> for PaymentStatus {
    fn from(status: CorePaymentStatus) -> Self {
        match status {
            CorePaymentStatus::Pending => Self::Pending,
            CorePaymentStatus::Partial => Self::Partial,
            CorePaymentStatus::Paid => Self::Paid,
            CorePaymentStatus::Voided => Self::Voided,
        }
    }
}

/// `payment_kind` enum: what a payment row settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_kind")]
pub enum PaymentKind {
    /// Tendered at the counter for a sale.
    #[sea_orm(string_value = "sale_payment")]
    SalePayment,
    /// Standalone payment against debt.
    #[sea_orm(string_value = "debt_payment")]
    DebtPayment,
    /// Standalone deposit on an account without debt.
    #[sea_orm(string_value = "advance_payment")]
    AdvancePayment,
    /// Prepaid credit applied to a sale.
    #[sea_orm(string_value = "credit_application")]
    CreditApplication,
}
