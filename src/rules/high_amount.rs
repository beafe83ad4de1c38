use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{RuleName, Transaction};
use crate::rules::traits::AnomalyRule;
use crate::storage::TransactionStore;

/// High-amount transaction rule.
///
/// Fires when the amount strictly exceeds the threshold
/// (50,000 currency units by default). Contributes +50.
#[derive(Debug)]
pub struct HighAmountRule {
    threshold: Decimal,
}

impl HighAmountRule {
    pub fn new() -> Self {
        HighAmountRule {
            threshold: Decimal::new(50_000, 0),
        }
    }

    pub fn with_threshold(threshold: Decimal) -> Self {
        HighAmountRule { threshold }
    }
}

impl Default for HighAmountRule {
    fn default() -> Self {
        HighAmountRule::new()
    }
}

#[async_trait]
impl AnomalyRule for HighAmountRule {
    fn name(&self) -> RuleName {
        RuleName::HighAmountTransaction
    }

    fn contribution(&self) -> u32 {
        50
    }

    async fn applies(
        &self,
        tx: &Transaction,
        _store: &dyn TransactionStore,
    ) -> anyhow::Result<bool> {
        Ok(tx.amount > self.threshold)
    }
}
