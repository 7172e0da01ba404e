//! `SeaORM` Entity for cash_closings table.

use mostrador_core::closing::RegisterState;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "cash_closings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub closing_date: Date,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub opening_balance: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub sales_total: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub expenses_total: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub cash_count: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub expected_cash: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub cash_difference: Option<Decimal>,
    pub notes: Option<String>,
    pub opened_at: DateTimeWithTimeZone,
    pub opened_by: i64,
    pub closed_at: Option<DateTimeWithTimeZone>,
    pub closed_by: Option<i64>,
    pub is_finalized: bool,
    pub finalized_at: Option<DateTimeWithTimeZone>,
    pub finalized_by: Option<i64>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Register state derived from the stored flags.
    #[must_use]
    pub const fn state(&self) -> RegisterState {
        RegisterState::from_flags(self.closed_at.is_some(), self.is_finalized)
    }
}
