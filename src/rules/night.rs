use async_trait::async_trait;
use chrono::Timelike;

use crate::domain::{RuleName, Transaction};
use crate::rules::traits::AnomalyRule;
use crate::storage::TransactionStore;

/// Night-time transaction rule.
///
/// Fires when the transaction's hour-of-day falls in [0, 5] inclusive,
/// taken from the stored UTC timestamp. Contributes +15.
#[derive(Debug)]
pub struct NightTimeRule {
    start_hour: u32,
    end_hour: u32,
}

impl NightTimeRule {
    pub fn new() -> Self {
        NightTimeRule {
            start_hour: 0,
            end_hour: 5,
        }
    }
}

impl Default for NightTimeRule {
    fn default() -> Self {
        NightTimeRule::new()
    }
}

#[async_trait]
impl AnomalyRule for NightTimeRule {
    fn name(&self) -> RuleName {
        RuleName::NightTimeTransaction
    }

    fn contribution(&self) -> u32 {
        15
    }

    async fn applies(
        &self,
        tx: &Transaction,
        _store: &dyn TransactionStore,
    ) -> anyhow::Result<bool> {
        let hour = tx.transaction_time.hour();
        Ok(hour >= self.start_hour && hour <= self.end_hour)
    }
}
