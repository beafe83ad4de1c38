use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::FraudStatus;

/// Unique transaction identifier, assigned by the store on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(pub Uuid);

impl TransactionId {
    pub fn new() -> Self {
        TransactionId(Uuid::new_v4())
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        TransactionId::new()
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Account number owning a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountNumber(pub String);

impl AccountNumber {
    pub fn new(account: impl Into<String>) -> Self {
        AccountNumber(account.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A banking transaction under fraud evaluation.
///
/// `risk_score` and `status` start unset and are written exactly once
/// by the scoring flow after evaluation completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Store-assigned identifier
    pub id: TransactionId,

    /// Account that submitted the transaction
    pub account_number: AccountNumber,

    /// Monetary amount (non-negative)
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,

    /// Free-text location of the transaction
    pub location: String,

    /// When the transaction occurred
    pub transaction_time: DateTime<Utc>,

    /// Final risk score in [0, 100], unset until scored
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<u8>,

    /// Fraud status derived from the final score, unset until scored
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<FraudStatus>,
}

/// A transaction as submitted by the ingestion path, before the store
/// assigns an identifier.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub account_number: AccountNumber,
    pub amount: Decimal,
    pub location: String,
    pub transaction_time: DateTime<Utc>,
}

impl NewTransaction {
    pub fn new(
        account_number: impl Into<String>,
        amount: Decimal,
        location: impl Into<String>,
        transaction_time: DateTime<Utc>,
    ) -> Self {
        NewTransaction {
            account_number: AccountNumber::new(account_number),
            amount,
            location: location.into(),
            transaction_time,
        }
    }

    /// Materialize a stored transaction with the given identifier.
    pub fn into_transaction(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            account_number: self.account_number,
            amount: self.amount,
            location: self.location,
            transaction_time: self.transaction_time,
            risk_score: None,
            status: None,
        }
    }
}
