//! Payment methods.

use serde::{Deserialize, Serialize};

/// How a sale or payment is settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash in the drawer.
    Cash,
    /// Bank transfer.
    Transfer,
    /// Debit or credit card.
    Card,
    /// Split across several methods.
    Mixed,
    /// Left owing on the customer's account.
    Credit,
    /// Paid from the customer's prepaid credit.
    AccountCredit,
}

impl PaymentMethod {
    /// Storage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Transfer => "transfer",
            Self::Card => "card",
            Self::Mixed => "mixed",
            Self::Credit => "credit",
            Self::AccountCredit => "account_credit",
        }
    }

    /// Money actually changes hands (cash, transfer, card).
    #[must_use]
    pub const fn is_tender(self) -> bool {
        matches!(self, Self::Cash | Self::Transfer | Self::Card)
    }

    /// Requires a customer account.
    #[must_use]
    pub const fn requires_customer(self) -> bool {
        matches!(self, Self::Credit | Self::AccountCredit)
    }

    /// Label printed on receipts.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cash => "Efectivo",
            Self::Transfer => "Transferencia",
            Self::Card => "Tarjeta",
            Self::Mixed => "Mixto",
            Self::Credit => "Cuenta corriente",
            Self::AccountCredit => "Saldo a favor",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cash" => Ok(Self::Cash),
            "transfer" => Ok(Self::Transfer),
            "card" => Ok(Self::Card),
            "mixed" => Ok(Self::Mixed),
            "credit" => Ok(Self::Credit),
            "account_credit" => Ok(Self::AccountCredit),
            _ => Err(format!("Unknown payment method: {s}")),
        }
    }
}
