//! Customer repository.

use chrono::Utc;
use mostrador_core::credit::CreditService;
use mostrador_core::ledger::LedgerError;
use mostrador_shared::types::{AccountId, CustomerId, PageRequest, PageResponse};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::info;

use super::customer_account::CustomerAccountError;
use crate::entities::{customer_accounts, customers};

/// Input for creating a customer.
#[derive(Debug, Clone)]
pub struct CreateCustomerInput {
    /// Display name.
    pub name: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Initial credit limit; zero means no limit.
    pub credit_limit: Decimal,
}

/// A customer and their account.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerWithAccount {
    /// The customer record.
    pub customer: customers::Model,
    /// The customer's account.
    pub account: customer_accounts::Model,
}

/// Customer repository.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    db: DatabaseConnection,
}

impl CustomerRepository {
    /// Creates a new customer repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a customer together with a settled account.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank, the credit limit is negative,
    /// or the database operation fails.
    pub async fn create_customer(
        &self,
        input: CreateCustomerInput,
    ) -> Result<CustomerWithAccount, CustomerAccountError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(CustomerAccountError::EmptyName);
        }
        let credit_limit = CreditService::validate_credit_limit(input.credit_limit)?;

        let now = Utc::now().into();
        let customer_id = CustomerId::new();

        let txn = self.db.begin().await?;

        let customer = customers::ActiveModel {
            id: Set(customer_id.into_inner()),
            name: Set(name.to_owned()),
            phone: Set(input.phone),
            email: Set(input.email),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let account = customer_accounts::ActiveModel {
            id: Set(AccountId::new().into_inner()),
            customer_id: Set(customer.id),
            account_balance: Set(Decimal::ZERO),
            credit_limit: Set(credit_limit.amount()),
            available_credit: Set(Decimal::ZERO),
            total_sales: Set(Decimal::ZERO),
            total_payments: Set(Decimal::ZERO),
            total_credit_notes: Set(Decimal::ZERO),
            total_debit_notes: Set(Decimal::ZERO),
            transaction_count: Set(0),
            last_transaction_date: Set(None),
            last_payment_date: Set(None),
            is_active: Set(true),
            blocked_until: Set(None),
            block_reason: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(customer_id = %customer_id, "Customer created");

        Ok(CustomerWithAccount { customer, account })
    }

    /// Gets a customer with their account.
    ///
    /// # Errors
    ///
    /// Returns `CustomerNotFound` if the customer does not exist.
    pub async fn get_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<CustomerWithAccount, CustomerAccountError> {
        let (customer, account) = customers::Entity::find_by_id(customer_id.into_inner())
            .find_also_related(customer_accounts::Entity)
            .one(&self.db)
            .await?
            .ok_or(LedgerError::CustomerNotFound(customer_id))?;
        let account = account.ok_or(LedgerError::AccountNotFound(customer_id))?;
        Ok(CustomerWithAccount { customer, account })
    }

    /// Lists active customers by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_customers(
        &self,
        page: &PageRequest,
    ) -> Result<PageResponse<customers::Model>, CustomerAccountError> {
        let query = customers::Entity::find().filter(customers::Column::IsActive.eq(true));
        let total = query.clone().count(&self.db).await?;
        let data = query
            .order_by_asc(customers::Column::Name)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;
        Ok(PageResponse::new(data, page, total))
    }
}
