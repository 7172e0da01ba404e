//! Customer account statements.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ledger::{Polarity, TransactionKind};

/// One ledger row as read back from storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerLine {
    /// Ledger row id.
    pub id: Uuid,
    /// Transaction kind.
    pub kind: TransactionKind,
    /// Positive magnitude.
    pub amount: Decimal,
    /// Balance before the row.
    pub balance_before: Decimal,
    /// Balance after the row.
    pub balance_after: Decimal,
    /// Business timestamp.
    pub transaction_date: DateTime<Utc>,
    /// Statement description.
    pub description: Option<String>,
    /// Originating document type.
    pub reference_type: Option<String>,
    /// Originating document id.
    pub reference_id: Option<Uuid>,
}

/// Sums over the statement window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementTotals {
    /// Sum of debit-polarity amounts.
    pub total_debits: Decimal,
    /// Sum of credit-polarity amounts.
    pub total_credits: Decimal,
    /// Sum of memo amounts (credit applications).
    pub total_memo: Decimal,
    /// Sum per kind.
    pub by_kind: BTreeMap<TransactionKind, Decimal>,
}

/// Account statement for a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    /// Inclusive start.
    pub start: DateTime<Utc>,
    /// Inclusive end.
    pub end: DateTime<Utc>,
    /// Balance right before `start`.
    pub opening_balance: Decimal,
    /// Opening balance plus the window's impacts.
    pub closing_balance: Decimal,
    /// Live account balance at the time the statement was produced.
    pub current_balance: Decimal,
    /// Rows in the window, oldest first.
    pub transactions: Vec<LedgerLine>,
    /// Window totals.
    pub totals: StatementTotals,
}

impl Statement {
    /// Opening balance given the latest row strictly before the window.
    #[must_use]
    pub fn opening_from(previous: Option<&LedgerLine>) -> Decimal {
        previous.map_or(Decimal::ZERO, |line| line.balance_after)
    }

    /// Builds a statement from rows already filtered to the window.
    #[must_use]
    pub fn build(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        opening_balance: Decimal,
        transactions: Vec<LedgerLine>,
        current_balance: Decimal,
    ) -> Self {
        let mut totals = StatementTotals::default();
        let mut closing_balance = opening_balance;

        for line in &transactions {
            match line.kind.polarity() {
                Polarity::Debit => totals.total_debits += line.amount,
                Polarity::Credit => totals.total_credits += line.amount,
                Polarity::Memo => totals.total_memo += line.amount,
            }
            *totals.by_kind.entry(line.kind).or_default() += line.amount;
            closing_balance += line.kind.impact_amount(line.amount);
        }

        Self {
            start,
            end,
            opening_balance,
            closing_balance,
            current_balance,
            transactions,
            totals,
        }
    }
}
