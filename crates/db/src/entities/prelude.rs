//! Entity re-exports.

pub use super::cash_closings::Entity as CashClosings;
pub use super::customer_accounts::Entity as CustomerAccounts;
pub use super::customer_transactions::Entity as CustomerTransactions;
pub use super::customers::Entity as Customers;
pub use super::expenses::Entity as Expenses;
pub use super::payments::Entity as Payments;
pub use super::products::Entity as Products;
pub use super::sale_items::Entity as SaleItems;
pub use super::sales::Entity as Sales;
