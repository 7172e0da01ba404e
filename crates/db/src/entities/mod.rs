//! `SeaORM` entity definitions.

pub mod prelude;

pub mod cash_closings;
pub mod customer_accounts;
pub mod customer_transactions;
pub mod customers;
pub mod expenses;
pub mod payments;
pub mod products;
pub mod sale_items;
pub mod sales;
pub mod sea_orm_active_enums;
