use async_trait::async_trait;

use crate::domain::Transaction;

/// Optional external risk-prediction capability.
///
/// Resolved once at startup; the engine checks for presence at
/// evaluation time instead of relying on wiring to skip it. A plugin
/// error never aborts scoring.
#[async_trait]
pub trait RiskPlugin: Send + Sync {
    /// Short name for logging.
    fn name(&self) -> &str;

    /// Auxiliary non-negative risk contribution for a transaction.
    async fn predict_risk(&self, tx: &Transaction) -> anyhow::Result<u32>;
}

/// Plugin returning a fixed contribution for every transaction.
///
/// Stand-in scorer for integration testing and for exercising the
/// aggregation path without a real model behind it.
#[derive(Debug)]
pub struct FixedRiskPlugin {
    score: u32,
}

impl FixedRiskPlugin {
    pub fn new(score: u32) -> Self {
        FixedRiskPlugin { score }
    }
}

#[async_trait]
impl RiskPlugin for FixedRiskPlugin {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn predict_risk(&self, _tx: &Transaction) -> anyhow::Result<u32> {
        Ok(self.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewTransaction, TransactionId};
    use chrono::Utc;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_fixed_plugin_returns_constant() {
        let plugin = FixedRiskPlugin::new(25);
        let tx = NewTransaction::new("A1", Decimal::new(1, 0), "NY", Utc::now())
            .into_transaction(TransactionId::new());

        assert_eq!(plugin.predict_risk(&tx).await.unwrap(), 25);
        assert_eq!(plugin.name(), "fixed");
    }
}
