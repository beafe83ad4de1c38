use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::{RuleName, Transaction};
use crate::storage::TransactionStore;

/// A named anomaly predicate over a transaction and its historical
/// context, with a fixed non-negative score contribution when true.
///
/// Predicates are independent of each other: every rule in the battery
/// is always evaluated, regardless of what fired before it. Context
/// reads go through the transaction store; a failed read aborts the
/// whole evaluation.
#[async_trait]
pub trait AnomalyRule: Send + Sync + Debug {
    /// Which rule this is, used for audit entries.
    fn name(&self) -> RuleName;

    /// Score added when the predicate holds.
    fn contribution(&self) -> u32;

    /// Whether the rule fires for this transaction.
    async fn applies(
        &self,
        tx: &Transaction,
        store: &dyn TransactionStore,
    ) -> anyhow::Result<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewTransaction;
    use crate::storage::MemoryStore;
    use chrono::Utc;
    use rust_decimal::Decimal;

    #[derive(Debug)]
    struct AlwaysFires;

    #[async_trait]
    impl AnomalyRule for AlwaysFires {
        fn name(&self) -> RuleName {
            RuleName::HighAmountTransaction
        }

        fn contribution(&self) -> u32 {
            7
        }

        async fn applies(
            &self,
            _tx: &Transaction,
            _store: &dyn TransactionStore,
        ) -> anyhow::Result<bool> {
            Ok(true)
        }
    }

    #[tokio::test]
    async fn test_rule_trait_object() {
        let rule: Box<dyn AnomalyRule> = Box::new(AlwaysFires);
        let store = MemoryStore::new();
        let tx = NewTransaction::new("A1", Decimal::new(1, 0), "NY", Utc::now())
            .into_transaction(crate::domain::TransactionId::new());

        assert!(rule.applies(&tx, &store).await.unwrap());
        assert_eq!(rule.contribution(), 7);
    }
}
