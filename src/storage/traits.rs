use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    AccountNumber, FraudLog, FraudStatus, NewTransaction, Transaction, TransactionId,
};

/// Durable record of transactions.
///
/// Ordering contract: `find_by_account` and `find_by_account_after`
/// return transactions in insertion order. The location-mismatch rule
/// depends on the last element being the most recently inserted one.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Persist a new transaction; the store assigns the identifier.
    async fn insert(&self, tx: &NewTransaction) -> anyhow::Result<Transaction>;

    /// Point lookup by identifier.
    async fn find(&self, id: TransactionId) -> anyhow::Result<Option<Transaction>>;

    /// All transactions for an account, in insertion order.
    async fn find_by_account(&self, account: &AccountNumber) -> anyhow::Result<Vec<Transaction>>;

    /// Transactions for an account with timestamp strictly after `after`,
    /// in insertion order.
    async fn find_by_account_after(
        &self,
        account: &AccountNumber,
        after: DateTime<Utc>,
    ) -> anyhow::Result<Vec<Transaction>>;

    /// Write the scoring result back onto a transaction record.
    async fn update_assessment(
        &self,
        id: TransactionId,
        risk_score: u8,
        status: FraudStatus,
    ) -> anyhow::Result<()>;

    /// All transactions (analytics).
    async fn find_all(&self) -> anyhow::Result<Vec<Transaction>>;

    /// All transactions with the given status (analytics).
    async fn find_by_status(&self, status: FraudStatus) -> anyhow::Result<Vec<Transaction>>;
}

/// Append-only sink of fired-rule audit entries.
#[async_trait]
pub trait FraudLogStore: Send + Sync {
    /// Append one entry. Fails with a data-access error on store failure.
    async fn append(&self, entry: &FraudLog) -> anyhow::Result<()>;

    /// All entries for a transaction, in append order.
    async fn find_by_transaction(&self, id: TransactionId) -> anyhow::Result<Vec<FraudLog>>;
}
