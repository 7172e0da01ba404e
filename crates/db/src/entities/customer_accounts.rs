//! `SeaORM` Entity for customer_accounts table.

use chrono::Utc;
use mostrador_core::ledger::AccountSnapshot;
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "customer_accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub customer_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub account_balance: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub credit_limit: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub available_credit: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub total_sales: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub total_payments: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub total_credit_notes: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub total_debit_notes: Decimal,
    pub transaction_count: i64,
    pub last_transaction_date: Option<DateTimeWithTimeZone>,
    pub last_payment_date: Option<DateTimeWithTimeZone>,
    pub is_active: bool,
    pub blocked_until: Option<DateTimeWithTimeZone>,
    pub block_reason: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customers::Entity",
        from = "Column::CustomerId",
        to = "super::customers::Column::Id"
    )]
    Customers,
    #[sea_orm(has_many = "super::customer_transactions::Entity")]
    CustomerTransactions,
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customers.def()
    }
}

impl Related<super::customer_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CustomerTransactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Domain view of the stored row.
    #[must_use]
    pub fn snapshot(&self) -> AccountSnapshot {
        AccountSnapshot {
            balance: self.account_balance,
            credit_limit: self.credit_limit,
            available_credit: self.available_credit,
            total_sales: self.total_sales,
            total_payments: self.total_payments,
            total_credit_notes: self.total_credit_notes,
            total_debit_notes: self.total_debit_notes,
            transaction_count: self.transaction_count,
            last_transaction_date: self.last_transaction_date.map(|d| d.with_timezone(&Utc)),
            last_payment_date: self.last_payment_date.map(|d| d.with_timezone(&Utc)),
            is_active: self.is_active,
            blocked_until: self.blocked_until.map(|d| d.with_timezone(&Utc)),
            block_reason: self.block_reason.clone(),
        }
    }
}

impl ActiveModel {
    /// Copies every ledger-maintained field of `snapshot` onto the row.
    pub fn apply_snapshot(&mut self, snapshot: &AccountSnapshot) {
        self.account_balance = Set(snapshot.balance);
        self.credit_limit = Set(snapshot.credit_limit);
        self.available_credit = Set(snapshot.available_credit);
        self.total_sales = Set(snapshot.total_sales);
        self.total_payments = Set(snapshot.total_payments);
        self.total_credit_notes = Set(snapshot.total_credit_notes);
        self.total_debit_notes = Set(snapshot.total_debit_notes);
        self.transaction_count = Set(snapshot.transaction_count);
        self.last_transaction_date = Set(snapshot.last_transaction_date.map(Into::into));
        self.last_payment_date = Set(snapshot.last_payment_date.map(Into::into));
        self.is_active = Set(snapshot.is_active);
        self.blocked_until = Set(snapshot.blocked_until.map(Into::into));
        self.block_reason = Set(snapshot.block_reason.clone());
    }
}
