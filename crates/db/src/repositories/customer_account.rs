//! Customer account repository: ledger postings, standalone payments,
//! account administration and receivable reports.

use chrono::{DateTime, NaiveDate, Utc};
use mostrador_core::credit::{
    AccountSummary, AgingInput, AgingReport, CreditAvailability, CreditService, LedgerLine,
    PaymentType, Statement,
};
use mostrador_core::ledger::{LedgerError, LedgerEvent, ReferenceType, TransactionKind};
use mostrador_core::sales::{MixedComponents, PaymentMethod, SaleError};
use mostrador_shared::types::{ActorId, CustomerId, Money, PaymentId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::info;

use super::ledger;
use crate::entities::{
    customer_accounts, customer_transactions, customers, payments,
    sea_orm_active_enums::PaymentKind,
};

/// Error types for customer account operations.
#[derive(Debug, thiserror::Error)]
pub enum CustomerAccountError {
    /// Customer name is blank.
    #[error("El nombre del cliente es obligatorio")]
    EmptyName,

    /// Ledger or credit policy rejected the operation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Payment components are invalid.
    #[error(transparent)]
    Sale(#[from] SaleError),

    /// Database error.
    #[error("Error de base de datos: {0}")]
    Database(#[from] DbErr),
}

impl CustomerAccountError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyName => "CUSTOMER_NAME_REQUIRED",
            Self::Ledger(e) => e.error_code(),
            Self::Sale(e) => e.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::EmptyName => 400,
            Self::Ledger(e) => e.http_status_code(),
            Self::Sale(e) => e.http_status_code(),
            Self::Database(_) => 500,
        }
    }
}

/// Input for posting an arbitrary ledger transaction.
#[derive(Debug, Clone)]
pub struct RecordTransactionInput {
    /// Customer.
    pub customer_id: CustomerId,
    /// Kind; decides the balance direction.
    pub kind: TransactionKind,
    /// Positive magnitude with at most two decimals.
    pub amount: Decimal,
    /// Originating document.
    pub reference: Option<(ReferenceType, uuid::Uuid)>,
    /// Statement description.
    pub description: Option<String>,
    /// Business date; defaults to now.
    pub transaction_date: Option<DateTime<Utc>>,
    /// Acting user.
    pub actor: ActorId,
}

/// Input for a standalone payment on a customer's account.
#[derive(Debug, Clone)]
pub struct RegisterPaymentInput {
    /// Customer.
    pub customer_id: CustomerId,
    /// Amount paid. Ignored for mixed payments, which use the component total.
    pub amount: Decimal,
    /// Cash, transfer, card or mixed.
    pub method: PaymentMethod,
    /// Components of a mixed payment.
    pub mixed: Option<MixedComponents>,
    /// Accept paying more than the debt; the excess becomes prepaid credit.
    pub allow_overpayment: bool,
    /// Receipt notes. Required for advances.
    pub notes: Option<String>,
    /// Acting user.
    pub actor: ActorId,
}

/// A recorded standalone payment.
#[derive(Debug, Clone, Serialize)]
pub struct RecordedPayment {
    /// Debt payment or advance.
    pub payment_type: PaymentType,
    /// One row per method component.
    pub payments: Vec<payments::Model>,
    /// The PAYMENT ledger row.
    pub transaction: customer_transactions::Model,
    /// Account after posting.
    pub account: customer_accounts::Model,
}

/// Customer account repository.
#[derive(Debug, Clone)]
pub struct CustomerAccountRepository {
    db: DatabaseConnection,
}

impl CustomerAccountRepository {
    /// Creates a new customer account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets the account of a customer.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the customer has no account.
    pub async fn get_customer_account(
        &self,
        customer_id: CustomerId,
    ) -> Result<customer_accounts::Model, CustomerAccountError> {
        customer_accounts::Entity::find()
            .filter(customer_accounts::Column::CustomerId.eq(customer_id.into_inner()))
            .one(&self.db)
            .await?
            .ok_or(CustomerAccountError::Ledger(LedgerError::AccountNotFound(
                customer_id,
            )))
    }

    /// Posts one ledger transaction and updates the account atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the kind is one the sale workflow posts (credit
    /// application, void), if the amount is not positive with at most two
    /// decimals, or if the account does not exist.
    pub async fn record_transaction(
        &self,
        input: RecordTransactionInput,
    ) -> Result<customer_transactions::Model, CustomerAccountError> {
        if input.kind.is_sale_managed() {
            return Err(LedgerError::SaleManagedKind(input.kind).into());
        }
        let mut event = LedgerEvent::new(
            input.kind,
            input.amount,
            input.actor,
            input.transaction_date.unwrap_or_else(Utc::now),
        )?;
        if let Some((reference_type, reference_id)) = input.reference {
            event = event.with_reference(reference_type, reference_id);
        }
        if let Some(description) = input.description {
            event = event.with_description(description);
        }

        let txn = self.db.begin().await?;
        let account =
            ledger::lock_account::<_, CustomerAccountError>(&txn, input.customer_id).await?;
        let (row, _) = ledger::post::<_, CustomerAccountError>(&txn, account, &event).await?;
        txn.commit().await?;

        Ok(row)
    }

    /// Reports whether the customer's balance is in their favor.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the customer has no account.
    pub async fn check_credit_availability(
        &self,
        customer_id: CustomerId,
    ) -> Result<CreditAvailability, CustomerAccountError> {
        let account = self.get_customer_account(customer_id).await?;
        Ok(CreditService::check_credit_availability(
            account.account_balance,
        ))
    }

    /// Records a standalone payment (no sale) against debt, or as an advance.
    ///
    /// Each method component becomes its own payment row; the ledger gets one
    /// PAYMENT for the combined amount. Paying into an account without debt
    /// requires `allow_overpayment` and a note.
    ///
    /// # Errors
    ///
    /// Returns an error if the method is not a tender, the amount is invalid,
    /// the payment exceeds the debt without allowance, an advance lacks a note,
    /// or the account is inactive or missing.
    pub async fn register_payment(
        &self,
        input: RegisterPaymentInput,
    ) -> Result<RecordedPayment, CustomerAccountError> {
        let parts = payment_parts(&input)?;
        let total: Decimal = parts.iter().map(|(_, amount)| *amount).sum();
        let amount = Money::positive(total).map_err(LedgerError::from)?;
        let now = Utc::now();

        let txn = self.db.begin().await?;
        let account =
            ledger::lock_account::<_, CustomerAccountError>(&txn, input.customer_id).await?;

        let classification = CreditService::validate_standalone_payment(
            &account.snapshot(),
            input.customer_id,
            amount,
            input.allow_overpayment,
            input.notes.as_deref(),
        )?;
        let (payment_kind, description) = match classification.payment_type {
            PaymentType::Payment => (PaymentKind::DebtPayment, "Pago de cuenta corriente"),
            PaymentType::AdvancePayment => (PaymentKind::AdvancePayment, "Pago anticipado"),
        };

        let mut rows = Vec::with_capacity(parts.len());
        for (method, part) in &parts {
            let row = payments::ActiveModel {
                id: Set(PaymentId::new().into_inner()),
                sale_id: Set(None),
                customer_id: Set(Some(input.customer_id.into_inner())),
                amount: Set(*part),
                payment_method: Set((*method).into()),
                payment_kind: Set(payment_kind),
                payment_date: Set(now.into()),
                notes: Set(input.notes.clone()),
                is_voided: Set(false),
                voided_at: Set(None),
                created_by: Set(input.actor.0),
                created_at: Set(now.into()),
            }
            .insert(&txn)
            .await?;
            rows.push(row);
        }

        let mut event = LedgerEvent::new(TransactionKind::Payment, amount.amount(), input.actor, now)?
            .with_description(description);
        if let Some(first) = rows.first() {
            event = event.with_reference(ReferenceType::Payment, first.id);
        }

        let (transaction, account) =
            ledger::post::<_, CustomerAccountError>(&txn, account, &event).await?;
        txn.commit().await?;

        info!(
            customer_id = %input.customer_id,
            amount = %amount,
            credit_deposit = %classification.credit_deposit,
            payment_type = ?classification.payment_type,
            "Standalone payment recorded"
        );

        Ok(RecordedPayment {
            payment_type: classification.payment_type,
            payments: rows,
            transaction,
            account,
        })
    }

    /// Sets the credit limit. Zero means no limit.
    ///
    /// # Errors
    ///
    /// Returns an error if the limit is negative or the account is missing.
    pub async fn set_credit_limit(
        &self,
        customer_id: CustomerId,
        limit: Decimal,
    ) -> Result<customer_accounts::Model, CustomerAccountError> {
        let limit = CreditService::validate_credit_limit(limit)?;
        self.update_account(customer_id, |account| {
            account.credit_limit = Set(limit.amount());
        })
        .await
    }

    /// Blocks new on-account sales until `until`.
    ///
    /// # Errors
    ///
    /// Returns an error if `until` is not in the future or the account is missing.
    pub async fn block_account(
        &self,
        customer_id: CustomerId,
        until: DateTime<Utc>,
        reason: Option<String>,
    ) -> Result<customer_accounts::Model, CustomerAccountError> {
        CreditService::validate_block(until, Utc::now())?;
        self.update_account(customer_id, |account| {
            account.blocked_until = Set(Some(until.into()));
            account.block_reason = Set(reason);
        })
        .await
    }

    /// Lifts a temporary block.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the customer has no account.
    pub async fn unblock_account(
        &self,
        customer_id: CustomerId,
    ) -> Result<customer_accounts::Model, CustomerAccountError> {
        self.update_account(customer_id, |account| {
            account.blocked_until = Set(None);
            account.block_reason = Set(None);
        })
        .await
    }

    /// Deactivates the account. Ledger history is kept.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the customer has no account.
    pub async fn deactivate_account(
        &self,
        customer_id: CustomerId,
    ) -> Result<customer_accounts::Model, CustomerAccountError> {
        self.update_account(customer_id, |account| {
            account.is_active = Set(false);
        })
        .await
    }

    async fn update_account<F>(
        &self,
        customer_id: CustomerId,
        change: F,
    ) -> Result<customer_accounts::Model, CustomerAccountError>
    where
        F: FnOnce(&mut customer_accounts::ActiveModel),
    {
        let txn = self.db.begin().await?;
        let account =
            ledger::lock_account::<_, CustomerAccountError>(&txn, customer_id).await?;
        let mut active = account.into_active_model();
        change(&mut active);
        active.updated_at = Set(Utc::now().into());
        let account = active.update(&txn).await?;
        txn.commit().await?;
        Ok(account)
    }

    /// Builds the customer's statement for `[start, end]`.
    ///
    /// The opening balance is the `balance_after` of the latest row dated
    /// strictly before `start`.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the customer has no account.
    pub async fn get_statement(
        &self,
        customer_id: CustomerId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Statement, CustomerAccountError> {
        let account = self.get_customer_account(customer_id).await?;

        let previous = customer_transactions::Entity::find()
            .filter(customer_transactions::Column::CustomerId.eq(customer_id.into_inner()))
            .filter(customer_transactions::Column::TransactionDate.lt(start))
            .order_by_desc(customer_transactions::Column::TransactionDate)
            .order_by_desc(customer_transactions::Column::CreatedAt)
            .one(&self.db)
            .await?
            .map(LedgerLine::from);

        let lines: Vec<LedgerLine> = customer_transactions::Entity::find()
            .filter(customer_transactions::Column::CustomerId.eq(customer_id.into_inner()))
            .filter(customer_transactions::Column::TransactionDate.gte(start))
            .filter(customer_transactions::Column::TransactionDate.lte(end))
            .order_by_asc(customer_transactions::Column::TransactionDate)
            .order_by_asc(customer_transactions::Column::CreatedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(LedgerLine::from)
            .collect();

        Ok(Statement::build(
            start,
            end,
            Statement::opening_from(previous.as_ref()),
            lines,
            account.account_balance,
        ))
    }

    /// Aggregates balances across all active accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_account_summary(&self) -> Result<AccountSummary, CustomerAccountError> {
        let balances: Vec<Decimal> = customer_accounts::Entity::find()
            .filter(customer_accounts::Column::IsActive.eq(true))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|account| account.account_balance)
            .collect();

        Ok(AccountSummary::from_balances(balances))
    }

    /// Ages every active account with debt as of `as_of`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_aging_report(
        &self,
        as_of: NaiveDate,
    ) -> Result<AgingReport, CustomerAccountError> {
        let rows = customer_accounts::Entity::find()
            .find_also_related(customers::Entity)
            .filter(customer_accounts::Column::IsActive.eq(true))
            .filter(customer_accounts::Column::AccountBalance.gt(Decimal::ZERO))
            .all(&self.db)
            .await?;

        let inputs = rows.into_iter().map(|(account, customer)| AgingInput {
            customer_id: CustomerId::from_uuid(account.customer_id),
            customer_name: customer.map(|c| c.name).unwrap_or_default(),
            balance: account.account_balance,
            last_payment_date: account.last_payment_date.map(|d| d.with_timezone(&Utc)),
            last_transaction_date: account
                .last_transaction_date
                .map(|d| d.with_timezone(&Utc)),
        });

        Ok(AgingReport::build(as_of, inputs))
    }

    /// Ledger rows of a customer, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_transactions(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<customer_transactions::Model>, CustomerAccountError> {
        let rows = customer_transactions::Entity::find()
            .filter(customer_transactions::Column::CustomerId.eq(customer_id.into_inner()))
            .order_by_asc(customer_transactions::Column::CreatedAt)
            .order_by_asc(customer_transactions::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows)
    }
}

/// Splits a standalone payment into per-method parts.
fn payment_parts(
    input: &RegisterPaymentInput,
) -> Result<Vec<(PaymentMethod, Decimal)>, CustomerAccountError> {
    match input.method {
        PaymentMethod::Cash | PaymentMethod::Transfer | PaymentMethod::Card => {
            Ok(vec![(input.method, input.amount)])
        }
        PaymentMethod::Mixed => {
            let components = input.mixed.ok_or(SaleError::MixedComponentsMissing)?;
            if !components.credit.is_zero() {
                return Err(LedgerError::UnsupportedPaymentMethod(
                    PaymentMethod::Credit.as_str().to_owned(),
                )
                .into());
            }
            let parts: Vec<(PaymentMethod, Decimal)> = [
                (PaymentMethod::Cash, components.cash),
                (PaymentMethod::Transfer, components.transfer),
                (PaymentMethod::Card, components.card),
            ]
            .into_iter()
            .filter(|(_, amount)| !amount.is_zero())
            .collect();
            for (_, amount) in &parts {
                Money::positive(*amount).map_err(LedgerError::from)?;
            }
            if parts.is_empty() {
                return Err(SaleError::MixedComponentsMissing.into());
            }
            Ok(parts)
        }
        PaymentMethod::Credit | PaymentMethod::AccountCredit => Err(
            LedgerError::UnsupportedPaymentMethod(input.method.as_str().to_owned()).into(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn input(method: PaymentMethod, mixed: Option<MixedComponents>) -> RegisterPaymentInput {
        RegisterPaymentInput {
            customer_id: CustomerId::new(),
            amount: dec!(100),
            method,
            mixed,
            allow_overpayment: false,
            notes: None,
            actor: ActorId(1),
        }
    }

    #[test]
    fn test_single_method_is_one_part() {
        let parts = payment_parts(&input(PaymentMethod::Transfer, None)).unwrap();
        assert_eq!(parts, vec![(PaymentMethod::Transfer, dec!(100))]);
    }

    #[test]
    fn test_mixed_skips_zero_components() {
        let mixed = MixedComponents {
            cash: dec!(60),
            transfer: dec!(0),
            card: dec!(50),
            credit: dec!(0),
        };
        let parts = payment_parts(&input(PaymentMethod::Mixed, Some(mixed))).unwrap();
        assert_eq!(
            parts,
            vec![(PaymentMethod::Cash, dec!(60)), (PaymentMethod::Card, dec!(50))]
        );
    }

    #[test]
    fn test_mixed_rejects_on_account_component() {
        let mixed = MixedComponents {
            cash: dec!(60),
            credit: dec!(40),
            ..MixedComponents::default()
        };
        let err = payment_parts(&input(PaymentMethod::Mixed, Some(mixed))).unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_PAYMENT_METHOD");
    }

    #[test]
    fn test_mixed_requires_components() {
        let err = payment_parts(&input(PaymentMethod::Mixed, None)).unwrap_err();
        assert_eq!(err.http_status_code(), 400);
    }

    #[test]
    fn test_non_tender_methods_rejected() {
        for method in [PaymentMethod::Credit, PaymentMethod::AccountCredit] {
            let err = payment_parts(&input(method, None)).unwrap_err();
            assert!(matches!(
                err,
                CustomerAccountError::Ledger(LedgerError::UnsupportedPaymentMethod(_))
            ));
        }
    }
}
