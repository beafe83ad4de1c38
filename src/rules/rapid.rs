use async_trait::async_trait;
use chrono::{Duration, Utc};

use crate::domain::{RuleName, Transaction};
use crate::rules::traits::AnomalyRule;
use crate::storage::TransactionStore;

/// Rapid-multiple-transactions rule.
///
/// Counts the account's transactions with timestamp strictly after
/// now minus the window (2 minutes by default) and fires when the
/// count reaches the limit (3 by default). Contributes +30.
///
/// The count is whatever the store returns at evaluation time. The
/// ingestion path persists the transaction under evaluation before
/// scoring, so it is included in its own window.
#[derive(Debug)]
pub struct RapidTransactionRule {
    window_minutes: i64,
    limit: usize,
}

impl RapidTransactionRule {
    pub fn new() -> Self {
        RapidTransactionRule {
            window_minutes: 2,
            limit: 3,
        }
    }

    pub fn with_limits(window_minutes: i64, limit: usize) -> Self {
        RapidTransactionRule {
            window_minutes,
            limit,
        }
    }
}

impl Default for RapidTransactionRule {
    fn default() -> Self {
        RapidTransactionRule::new()
    }
}

#[async_trait]
impl AnomalyRule for RapidTransactionRule {
    fn name(&self) -> RuleName {
        RuleName::RapidMultipleTransactions
    }

    fn contribution(&self) -> u32 {
        30
    }

    async fn applies(
        &self,
        tx: &Transaction,
        store: &dyn TransactionStore,
    ) -> anyhow::Result<bool> {
        let cutoff = Utc::now() - Duration::minutes(self.window_minutes);
        let recent = store
            .find_by_account_after(&tx.account_number, cutoff)
            .await?;

        Ok(recent.len() >= self.limit)
    }
}
