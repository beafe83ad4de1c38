pub mod high_amount;
pub mod location;
pub mod night;
pub mod rapid;
pub mod traits;

pub use high_amount::HighAmountRule;
pub use location::LocationMismatchRule;
pub use night::NightTimeRule;
pub use rapid::RapidTransactionRule;
pub use traits::AnomalyRule;

use std::sync::Arc;
use tracing::debug;

use crate::domain::{FraudLog, RuleName, Transaction};
use crate::storage::{FraudLogStore, TransactionStore};

/// One rule firing, with the cumulative base score at that moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiredRule {
    pub rule: RuleName,
    pub cumulative_score: u32,
}

/// Outcome of running the battery against one transaction.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Sum of all fired contributions, before any plugin contribution
    pub base_score: u32,

    /// Fired rules in evaluation order
    pub fired: Vec<FiredRule>,
}

/// The fixed, ordered battery of anomaly rules.
///
/// Order is significant: each audit entry records the cumulative score
/// at the time its rule fired, so later rules see the total from
/// earlier ones. Every rule is always evaluated; there is no
/// short-circuiting, and each contributes at most once.
pub struct RuleBattery {
    rules: Vec<Arc<dyn AnomalyRule>>,
}

impl RuleBattery {
    /// The standard four-rule battery in its canonical order:
    /// high amount, rapid transactions, location mismatch, night time.
    pub fn standard() -> Self {
        RuleBattery {
            rules: vec![
                Arc::new(HighAmountRule::new()),
                Arc::new(RapidTransactionRule::new()),
                Arc::new(LocationMismatchRule::new()),
                Arc::new(NightTimeRule::new()),
            ],
        }
    }

    /// Build a battery from an explicit rule sequence.
    pub fn from_rules(rules: Vec<Arc<dyn AnomalyRule>>) -> Self {
        RuleBattery { rules }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every rule in order, appending one audit entry per fired
    /// rule with the cumulative score after its contribution.
    ///
    /// Any context-query or audit-append error aborts the evaluation;
    /// entries already appended are not rolled back.
    pub async fn evaluate(
        &self,
        tx: &Transaction,
        store: &dyn TransactionStore,
        audit: &dyn FraudLogStore,
    ) -> anyhow::Result<Evaluation> {
        let mut base_score = 0u32;
        let mut fired = Vec::new();

        for rule in &self.rules {
            if rule.applies(tx, store).await? {
                base_score += rule.contribution();

                audit
                    .append(&FraudLog::new(tx.id, rule.name(), base_score))
                    .await?;

                debug!(
                    transaction_id = %tx.id,
                    rule = %rule.name(),
                    cumulative_score = base_score,
                    "Rule fired"
                );

                fired.push(FiredRule {
                    rule: rule.name(),
                    cumulative_score: base_score,
                });
            }
        }

        Ok(Evaluation { base_score, fired })
    }
}
