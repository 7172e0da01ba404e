//! The single write path for the customer ledger.
//!
//! Every balance change goes through [`post`]: it applies the event to the
//! locked account row and appends the ledger row on the same connection, so
//! callers inside a transaction get both writes or neither.

use chrono::Utc;
use mostrador_core::ledger::{LedgerError, LedgerEvent, LedgerService};
use mostrador_shared::types::CustomerId;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QuerySelect, Set,
};
use tracing::debug;
use uuid::Uuid;

use crate::entities::{customer_accounts, customer_transactions};

/// Locks the customer's account row until the enclosing transaction ends.
pub(crate) async fn lock_account<C, E>(
    conn: &C,
    customer_id: CustomerId,
) -> Result<customer_accounts::Model, E>
where
    C: ConnectionTrait,
    E: From<LedgerError> + From<DbErr>,
{
    customer_accounts::Entity::find()
        .filter(customer_accounts::Column::CustomerId.eq(customer_id.into_inner()))
        .lock_exclusive()
        .one(conn)
        .await?
        .ok_or_else(|| E::from(LedgerError::AccountNotFound(customer_id)))
}

/// Posts `event` against a locked `account` row.
///
/// Returns the new ledger row and the updated account; post further events
/// against the returned account, never the stale one.
pub(crate) async fn post<C, E>(
    conn: &C,
    account: customer_accounts::Model,
    event: &LedgerEvent,
) -> Result<(customer_transactions::Model, customer_accounts::Model), E>
where
    C: ConnectionTrait,
    E: From<LedgerError> + From<DbErr>,
{
    let mut snapshot = account.snapshot();
    let posting = LedgerService::post(&mut snapshot, event);

    let now = Utc::now();
    let customer_id = account.customer_id;
    let account_id = account.id;

    let mut active = account.into_active_model();
    active.apply_snapshot(&snapshot);
    active.updated_at = Set(now.into());
    let account = active.update(conn).await?;

    let row = customer_transactions::ActiveModel {
        id: Set(Uuid::now_v7()),
        customer_id: Set(customer_id),
        account_id: Set(account_id),
        transaction_type: Set(event.kind.into()),
        amount: Set(posting.amount),
        balance_before: Set(posting.balance_before),
        balance_after: Set(posting.balance_after),
        reference_type: Set(event
            .reference
            .map(|r| r.reference_type.as_str().to_owned())),
        reference_id: Set(event.reference.map(|r| r.reference_id)),
        description: Set(event.description.clone()),
        transaction_date: Set(event.transaction_date.into()),
        created_by: Set(event.actor.0),
        created_at: Set(now.into()),
    }
    .insert(conn)
    .await?;

    debug!(
        customer_id = %customer_id,
        kind = %event.kind,
        amount = %posting.amount,
        balance_after = %posting.balance_after,
        available_credit = %account.available_credit,
        "ledger posting"
    );

    Ok((row, account))
}
