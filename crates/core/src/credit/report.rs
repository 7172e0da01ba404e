//! Receivables summary and aging report.

use chrono::{DateTime, NaiveDate, Utc};
use mostrador_shared::types::CustomerId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Receivables across all active accounts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    /// Number of accounts considered.
    pub total_accounts: u64,
    /// Accounts with a positive balance.
    pub accounts_with_debt: u64,
    /// Accounts with a negative balance.
    pub accounts_with_credit: u64,
    /// Sum of positive balances.
    pub total_debt: Decimal,
    /// Sum of absolute negative balances.
    pub total_credit: Decimal,
    /// `total_debt - total_credit`.
    pub net_receivable: Decimal,
}

impl AccountSummary {
    /// Aggregates account balances.
    pub fn from_balances<I>(balances: I) -> Self
    where
        I: IntoIterator<Item = Decimal>,
    {
        let mut summary = Self::default();
        for balance in balances {
            summary.total_accounts += 1;
            if balance > Decimal::ZERO {
                summary.accounts_with_debt += 1;
                summary.total_debt += balance;
            } else if balance < Decimal::ZERO {
                summary.accounts_with_credit += 1;
                summary.total_credit += balance.abs();
            }
        }
        summary.net_receivable = summary.total_debt - summary.total_credit;
        summary
    }
}

/// Age bucket by days since last payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgingBucket {
    /// 0-30 days.
    #[serde(rename = "0-30")]
    Current,
    /// 31-60 days.
    #[serde(rename = "31-60")]
    Days31To60,
    /// 61-90 days.
    #[serde(rename = "61-90")]
    Days61To90,
    /// More than 90 days.
    #[serde(rename = "90+")]
    Over90,
}

impl AgingBucket {
    /// Bucket for an age in days. Future dates count as current.
    #[must_use]
    pub const fn for_days(days: i64) -> Self {
        match days {
            i64::MIN..=30 => Self::Current,
            31..=60 => Self::Days31To60,
            61..=90 => Self::Days61To90,
            _ => Self::Over90,
        }
    }
}

/// Account data needed to age a debt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgingInput {
    /// Customer.
    pub customer_id: CustomerId,
    /// Customer display name.
    pub customer_name: String,
    /// Current balance.
    pub balance: Decimal,
    /// Latest payment.
    pub last_payment_date: Option<DateTime<Utc>>,
    /// Latest ledger row.
    pub last_transaction_date: Option<DateTime<Utc>>,
}

/// One indebted account in the aging report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgingRow {
    /// Customer.
    pub customer_id: CustomerId,
    /// Customer display name.
    pub customer_name: String,
    /// Outstanding debt.
    pub balance: Decimal,
    /// Days since the reference date.
    pub days: i64,
    /// Bucket.
    pub bucket: AgingBucket,
}

/// Debts grouped by age.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgingReport {
    /// Report date.
    pub as_of: NaiveDate,
    /// Indebted accounts, oldest first.
    pub rows: Vec<AgingRow>,
    /// Debt in 0-30.
    pub current: Decimal,
    /// Debt in 31-60.
    pub days_31_60: Decimal,
    /// Debt in 61-90.
    pub days_61_90: Decimal,
    /// Debt over 90 days.
    pub over_90: Decimal,
    /// Sum of all buckets.
    pub total: Decimal,
}

impl AgingReport {
    /// Ages every account with debt as of `as_of`.
    pub fn build<I>(as_of: NaiveDate, accounts: I) -> Self
    where
        I: IntoIterator<Item = AgingInput>,
    {
        let mut report = Self {
            as_of,
            rows: Vec::new(),
            current: Decimal::ZERO,
            days_31_60: Decimal::ZERO,
            days_61_90: Decimal::ZERO,
            over_90: Decimal::ZERO,
            total: Decimal::ZERO,
        };

        for account in accounts.into_iter().filter(|a| a.balance > Decimal::ZERO) {
            let days = account
                .last_payment_date
                .or(account.last_transaction_date)
                .map_or(0, |date| (as_of - date.date_naive()).num_days());
            let bucket = AgingBucket::for_days(days);

            match bucket {
                AgingBucket::Current => report.current += account.balance,
                AgingBucket::Days31To60 => report.days_31_60 += account.balance,
                AgingBucket::Days61To90 => report.days_61_90 += account.balance,
                AgingBucket::Over90 => report.over_90 += account.balance,
            }
            report.total += account.balance;
            report.rows.push(AgingRow {
                customer_id: account.customer_id,
                customer_name: account.customer_name,
                balance: account.balance,
                days,
                bucket,
            });
        }

        report.rows.sort_by(|a, b| b.days.cmp(&a.days));
        report
    }
}
