//! `SeaORM` Entity for customer_transactions table.
//!
//! Rows are append-only; the database rejects updates and deletes.

use chrono::Utc;
use mostrador_core::credit::LedgerLine;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::TransactionType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "customer_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_id: Uuid,
    pub account_id: Uuid,
    pub transaction_type: TransactionType,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub balance_before: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub balance_after: Decimal,
    pub reference_type: Option<String>,
    pub reference_id: Option<Uuid>,
    pub description: Option<String>,
    pub transaction_date: DateTimeWithTimeZone,
    pub created_by: i64,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customer_accounts::Entity",
        from = "Column::AccountId",
        to = "super::customer_accounts::Column::Id"
    )]
    CustomerAccounts,
}

impl Related<super::customer_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CustomerAccounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for LedgerLine {
    fn from(row: Model) -> Self {
        Self {
            id: row.id,
            kind: row.transaction_type.into(),
            amount: row.amount,
            balance_before: row.balance_before,
            balance_after: row.balance_after,
            transaction_date: row.transaction_date.with_timezone(&Utc),
            description: row.description,
            reference_type: row.reference_type,
            reference_id: row.reference_id,
        }
    }
}
