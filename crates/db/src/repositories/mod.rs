//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Every public write runs inside one database transaction.

mod ledger;

pub mod cash_closing;
pub mod customer;
pub mod customer_account;
pub mod expense;
pub mod product;
pub mod sale;

pub use cash_closing::{CashClosingError, CashClosingRepository, ClosingResult, DailySummary};
pub use customer::{CreateCustomerInput, CustomerRepository, CustomerWithAccount};
pub use customer_account::{
    CustomerAccountError, CustomerAccountRepository, RecordTransactionInput, RecordedPayment,
    RegisterPaymentInput,
};
pub use expense::{ExpenseError, ExpenseRepository, RecordExpenseInput};
pub use product::{CreateProductInput, ProductRepository};
pub use sale::{
    AppliedCredit, CreateSaleInput, SaleItemInput, SaleRepoError, SaleRepository, SaleWithDetails,
};
