//! Ledger service: turns a business event into a balance mutation.
//!
//! [`LedgerService::post`] is the only code that mutates an
//! [`AccountSnapshot`]. Persistence layers call it while holding the account
//! row lock and write the returned [`Posting`] as the ledger row in the same
//! database transaction.

use chrono::{DateTime, Utc};
use mostrador_shared::types::{ActorId, Money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::account::{AccountSnapshot, Posting};
use super::error::LedgerError;
use super::kind::TransactionKind;

/// Type of document a ledger row points back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceType {
    /// A sale.
    Sale,
    /// A standalone payment.
    Payment,
    /// A repair order.
    Repair,
    /// Entered by hand (adjustments, notes, opening balances).
    Manual,
}

impl ReferenceType {
    /// Storage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sale => "sale",
            Self::Payment => "payment",
            Self::Repair => "repair",
            Self::Manual => "manual",
        }
    }
}

/// Loose link from a ledger row to its originating document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Document type.
    pub reference_type: ReferenceType,
    /// Document id (not a foreign key).
    pub reference_id: Uuid,
}

/// A balance-affecting event for one customer account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEvent {
    /// Transaction kind; decides the balance direction.
    pub kind: TransactionKind,
    /// Positive magnitude.
    pub amount: Money,
    /// Originating document.
    pub reference: Option<Reference>,
    /// Free text shown on statements.
    pub description: Option<String>,
    /// Business timestamp, may be backdated.
    pub transaction_date: DateTime<Utc>,
    /// User performing the mutation.
    pub actor: ActorId,
}

impl LedgerEvent {
    /// Builds an event, rejecting non-positive amounts or fractions of cents.
    pub fn new(
        kind: TransactionKind,
        amount: Decimal,
        actor: ActorId,
        transaction_date: DateTime<Utc>,
    ) -> Result<Self, LedgerError> {
        Ok(Self {
            kind,
            amount: Money::positive(amount)?,
            reference: None,
            description: None,
            transaction_date,
            actor,
        })
    }

    /// Links the event to a document.
    #[must_use]
    pub fn with_reference(mut self, reference_type: ReferenceType, reference_id: Uuid) -> Self {
        self.reference = Some(Reference {
            reference_type,
            reference_id,
        });
        self
    }

    /// Sets the statement description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Ledger posting rules. Stateless.
pub struct LedgerService;

impl LedgerService {
    /// Posts `event` against `account`.
    ///
    /// Whether a credit application is covered is decided before posting, see
    /// `CreditService::validate_credit_application`; here it is a memo row.
    pub fn post(account: &mut AccountSnapshot, event: &LedgerEvent) -> Posting {
        account.apply(event.kind, event.amount.amount(), event.transaction_date)
    }

    /// Balance obtained by replaying transactions from zero.
    pub fn replay<I>(transactions: I) -> Decimal
    where
        I: IntoIterator<Item = (TransactionKind, Decimal)>,
    {
        transactions
            .into_iter()
            .map(|(kind, amount)| kind.impact_amount(amount))
            .sum()
    }

    /// Checks that postings chain without gaps and end at `current_balance`.
    ///
    /// An empty history is consistent only with a zero balance.
    #[must_use]
    pub fn is_consistent(postings: &[Posting], current_balance: Decimal) -> bool {
        let mut expected_before = Decimal::ZERO;
        for posting in postings {
            if posting.balance_before != expected_before
                || posting.balance_after != posting.balance_before + posting.kind.impact_amount(posting.amount)
                || posting.amount <= Decimal::ZERO
            {
                return false;
            }
            expected_before = posting.balance_after;
        }
        expected_before == current_balance
    }
}
