pub mod aggregate;
pub mod error;

pub use aggregate::{aggregate, MAX_SCORE};
pub use error::ScoreError;

use ahash::AHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::warn;

use crate::domain::{AccountNumber, FraudStatus, Transaction};
use crate::observability::MetricsRegistry;
use crate::plugin::RiskPlugin;
use crate::rules::{FiredRule, RuleBattery};
use crate::storage::{FraudLogStore, TransactionStore};

/// Number of account lock stripes.
/// Must be a power of 2 for fast modulo via bitwise AND.
const LOCK_STRIPES: usize = 64;

/// Striped per-account locks.
///
/// Evaluations for the same account number are serialized so the
/// rapid-transaction and location-mismatch rules read a stable
/// snapshot of that account's history. Stripe collisions serialize
/// unrelated accounts occasionally; that only costs latency, never
/// correctness.
struct AccountLocks {
    stripes: Vec<Mutex<()>>,
}

impl AccountLocks {
    fn new() -> Self {
        AccountLocks {
            stripes: (0..LOCK_STRIPES).map(|_| Mutex::new(())).collect(),
        }
    }

    async fn lock(&self, account: &AccountNumber) -> MutexGuard<'_, ()> {
        let mut hasher = AHasher::default();
        account.as_str().hash(&mut hasher);
        let idx = (hasher.finish() as usize) & (LOCK_STRIPES - 1);
        self.stripes[idx].lock().await
    }
}

/// Result of scoring one transaction.
#[derive(Debug, Clone)]
pub struct Assessment {
    /// Sum of fired rule contributions
    pub base_score: u32,

    /// Base score plus plugin contribution, clamped to [0, 100]
    pub final_score: u8,

    /// Status derived from the final score
    pub status: FraudStatus,

    /// Fired rules in evaluation order
    pub fired: Vec<FiredRule>,
}

/// The rule-based risk-scoring engine.
///
/// Runs the anomaly battery against a transaction and its stored
/// history, adds the optional plugin contribution, and classifies the
/// clamped final score. The caller persists the result back onto the
/// transaction record.
pub struct RiskEngine {
    store: Arc<dyn TransactionStore>,
    audit: Arc<dyn FraudLogStore>,
    battery: RuleBattery,
    plugin: Option<Arc<dyn RiskPlugin>>,
    ml_enabled: bool,
    metrics: Arc<MetricsRegistry>,
    account_locks: AccountLocks,
}

impl RiskEngine {
    /// Engine with the standard battery and no plugin.
    pub fn new(
        store: Arc<dyn TransactionStore>,
        audit: Arc<dyn FraudLogStore>,
        metrics: Arc<MetricsRegistry>,
    ) -> Self {
        RiskEngine {
            store,
            audit,
            battery: RuleBattery::standard(),
            plugin: None,
            ml_enabled: false,
            metrics,
            account_locks: AccountLocks::new(),
        }
    }

    /// Bind a risk-prediction plugin.
    pub fn with_plugin(mut self, plugin: Arc<dyn RiskPlugin>) -> Self {
        self.plugin = Some(plugin);
        self
    }

    /// Enable or disable the ML contribution. With no plugin bound,
    /// enabling has no effect.
    pub fn with_ml_enabled(mut self, enabled: bool) -> Self {
        self.ml_enabled = enabled;
        self
    }

    /// Replace the standard battery (tests, tuning).
    pub fn with_battery(mut self, battery: RuleBattery) -> Self {
        self.battery = battery;
        self
    }

    /// Number of rules in the battery.
    pub fn rules_loaded(&self) -> usize {
        self.battery.len()
    }

    /// Score one transaction.
    ///
    /// The transaction must already be persisted (audit entries
    /// reference its identifier, and the rapid-transaction window sees
    /// it in the store). On a data-access failure the evaluation
    /// aborts with no score; audit entries appended before the failure
    /// are not rolled back.
    pub async fn score_transaction(&self, tx: &Transaction) -> Result<Assessment, ScoreError> {
        let _guard = self.account_locks.lock(&tx.account_number).await;

        let evaluation = self
            .battery
            .evaluate(tx, self.store.as_ref(), self.audit.as_ref())
            .await
            .map_err(ScoreError::DataAccess)?;

        for fired in &evaluation.fired {
            self.metrics.record_rule_fire(fired.rule);
        }

        let ml_contribution = self.ml_contribution(tx).await;
        let final_score = aggregate(evaluation.base_score, ml_contribution);
        let status = FraudStatus::classify(final_score);

        Ok(Assessment {
            base_score: evaluation.base_score,
            final_score,
            status,
            fired: evaluation.fired,
        })
    }

    /// Plugin contribution, or 0 when disabled, unbound, or failing.
    async fn ml_contribution(&self, tx: &Transaction) -> u32 {
        if !self.ml_enabled {
            return 0;
        }

        let Some(plugin) = &self.plugin else {
            // Flag on with nothing bound behaves like the flag off
            return 0;
        };

        match plugin.predict_risk(tx).await {
            Ok(score) => score,
            Err(e) => {
                warn!(
                    transaction_id = %tx.id,
                    plugin = plugin.name(),
                    error = %e,
                    "Risk plugin failed, contribution treated as 0"
                );
                self.metrics.record_plugin_failure();
                0
            }
        }
    }
}
