use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::domain::{
    AccountNumber, FraudLog, FraudStatus, NewTransaction, Transaction, TransactionId,
};

use super::traits::{FraudLogStore, TransactionStore};

/// In-memory store backing both the transaction record and the fraud
/// audit log. Default backend when no database is configured, and the
/// test double throughout the crate.
///
/// Transactions are kept in a flat vector so account queries preserve
/// insertion order, which the location-mismatch rule relies on.
#[derive(Debug, Default)]
pub struct MemoryStore {
    transactions: Mutex<Vec<Transaction>>,
    fraud_logs: Mutex<Vec<FraudLog>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored transactions (for assertions).
    pub fn transaction_count(&self) -> usize {
        self.transactions.lock().len()
    }

    /// All fraud log entries in append order (for assertions).
    pub fn all_fraud_logs(&self) -> Vec<FraudLog> {
        self.fraud_logs.lock().clone()
    }
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn insert(&self, tx: &NewTransaction) -> anyhow::Result<Transaction> {
        let stored = tx.clone().into_transaction(TransactionId::new());
        self.transactions.lock().push(stored.clone());
        Ok(stored)
    }

    async fn find(&self, id: TransactionId) -> anyhow::Result<Option<Transaction>> {
        Ok(self
            .transactions
            .lock()
            .iter()
            .find(|t| t.id == id)
            .cloned())
    }

    async fn find_by_account(&self, account: &AccountNumber) -> anyhow::Result<Vec<Transaction>> {
        Ok(self
            .transactions
            .lock()
            .iter()
            .filter(|t| &t.account_number == account)
            .cloned()
            .collect())
    }

    async fn find_by_account_after(
        &self,
        account: &AccountNumber,
        after: DateTime<Utc>,
    ) -> anyhow::Result<Vec<Transaction>> {
        Ok(self
            .transactions
            .lock()
            .iter()
            .filter(|t| &t.account_number == account && t.transaction_time > after)
            .cloned()
            .collect())
    }

    async fn update_assessment(
        &self,
        id: TransactionId,
        risk_score: u8,
        status: FraudStatus,
    ) -> anyhow::Result<()> {
        let mut transactions = self.transactions.lock();
        let tx = transactions
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| anyhow::anyhow!("transaction {id} not found"))?;

        tx.risk_score = Some(risk_score);
        tx.status = Some(status);
        Ok(())
    }

    async fn find_all(&self) -> anyhow::Result<Vec<Transaction>> {
        Ok(self.transactions.lock().clone())
    }

    async fn find_by_status(&self, status: FraudStatus) -> anyhow::Result<Vec<Transaction>> {
        Ok(self
            .transactions
            .lock()
            .iter()
            .filter(|t| t.status == Some(status))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl FraudLogStore for MemoryStore {
    async fn append(&self, entry: &FraudLog) -> anyhow::Result<()> {
        self.fraud_logs.lock().push(entry.clone());
        Ok(())
    }

    async fn find_by_transaction(&self, id: TransactionId) -> anyhow::Result<Vec<FraudLog>> {
        Ok(self
            .fraud_logs
            .lock()
            .iter()
            .filter(|l| l.transaction_id == id)
            .cloned()
            .collect())
    }
}
