use async_trait::async_trait;

use crate::domain::{RuleName, Transaction};
use crate::rules::traits::AnomalyRule;
use crate::storage::TransactionStore;

/// Location-mismatch rule.
///
/// Compares the current location against the account's most recently
/// inserted prior transaction, case-insensitively. Fires on a
/// difference; never fires when the account has no prior history.
/// Contributes +20.
///
/// "Most recent" means last in store insertion order, not latest
/// timestamp. The transaction under evaluation is excluded from the
/// history, since the ingestion path persists it before scoring.
#[derive(Debug, Default)]
pub struct LocationMismatchRule;

impl LocationMismatchRule {
    pub fn new() -> Self {
        LocationMismatchRule
    }
}

#[async_trait]
impl AnomalyRule for LocationMismatchRule {
    fn name(&self) -> RuleName {
        RuleName::LocationMismatch
    }

    fn contribution(&self) -> u32 {
        20
    }

    async fn applies(
        &self,
        tx: &Transaction,
        store: &dyn TransactionStore,
    ) -> anyhow::Result<bool> {
        let history = store.find_by_account(&tx.account_number).await?;

        let last_prior = history.iter().filter(|t| t.id != tx.id).last();

        Ok(match last_prior {
            Some(prev) => prev.location.to_lowercase() != tx.location.to_lowercase(),
            None => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewTransaction, TransactionId};
    use crate::storage::MemoryStore;
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;

    async fn seed(store: &MemoryStore, account: &str, location: &str) {
        store
            .insert(&NewTransaction::new(
                account,
                Decimal::new(100, 0),
                location,
                Utc::now(),
            ))
            .await
            .unwrap();
    }

    fn current_tx(account: &str, location: &str) -> Transaction {
        NewTransaction::new(account, Decimal::new(100, 0), location, Utc::now())
            .into_transaction(TransactionId::new())
    }

    #[tokio::test]
    async fn test_no_history_never_fires() {
        let rule = LocationMismatchRule::new();
        let store = MemoryStore::new();

        assert!(!rule.applies(&current_tx("A1", "NY"), &store).await.unwrap());
    }

    #[tokio::test]
    async fn test_different_location_fires() {
        let rule = LocationMismatchRule::new();
        let store = MemoryStore::new();
        seed(&store, "A1", "LA").await;

        assert!(rule.applies(&current_tx("A1", "NY"), &store).await.unwrap());
        assert_eq!(rule.contribution(), 20);
    }

    #[tokio::test]
    async fn test_same_location_case_insensitive() {
        let rule = LocationMismatchRule::new();
        let store = MemoryStore::new();
        seed(&store, "A1", "New York").await;

        assert!(!rule
            .applies(&current_tx("A1", "NEW YORK"), &store)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_last_inserted_wins_over_timestamp() {
        let rule = LocationMismatchRule::new();
        let store = MemoryStore::new();

        // Newer timestamp inserted first, older timestamp inserted last:
        // insertion order decides which one is "most recent".
        store
            .insert(&NewTransaction::new(
                "A1",
                Decimal::new(100, 0),
                "NY",
                Utc::now(),
            ))
            .await
            .unwrap();
        store
            .insert(&NewTransaction::new(
                "A1",
                Decimal::new(100, 0),
                "LA",
                Utc::now() - Duration::hours(2),
            ))
            .await
            .unwrap();

        // Current location NY differs from last-inserted LA
        assert!(rule.applies(&current_tx("A1", "NY"), &store).await.unwrap());
    }

    #[tokio::test]
    async fn test_in_flight_transaction_excluded_from_history() {
        let rule = LocationMismatchRule::new();
        let store = MemoryStore::new();
        seed(&store, "A1", "LA").await;

        // Persist the transaction under evaluation first, as ingestion
        // does; comparing against itself would mask the mismatch.
        let tx = store
            .insert(&NewTransaction::new(
                "A1",
                Decimal::new(100, 0),
                "NY",
                Utc::now(),
            ))
            .await
            .unwrap();

        assert!(rule.applies(&tx, &store).await.unwrap());
    }

    #[tokio::test]
    async fn test_only_own_transaction_in_store() {
        let rule = LocationMismatchRule::new();
        let store = MemoryStore::new();

        let tx = store
            .insert(&NewTransaction::new(
                "A1",
                Decimal::new(100, 0),
                "NY",
                Utc::now(),
            ))
            .await
            .unwrap();

        // History minus itself is empty, so the rule cannot fire
        assert!(!rule.applies(&tx, &store).await.unwrap());
    }
}
