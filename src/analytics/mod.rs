use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::FraudStatus;
use crate::storage::TransactionStore;

/// Aggregate fraud counts over all stored transactions.
#[derive(Debug, Serialize)]
pub struct FraudSummary {
    pub total_transactions: usize,
    pub fraud_transactions: usize,
    pub suspicious_transactions: usize,
    pub fraud_rate_percent: f64,
}

/// Read-only reporting over already-scored transactions.
#[derive(Clone)]
pub struct Analytics {
    store: Arc<dyn TransactionStore>,
}

impl Analytics {
    pub fn new(store: Arc<dyn TransactionStore>) -> Self {
        Analytics { store }
    }

    /// Totals and fraud rate across all transactions.
    pub async fn fraud_summary(&self) -> anyhow::Result<FraudSummary> {
        let all = self.store.find_all().await?;
        let fraud = self.store.find_by_status(FraudStatus::Fraud).await?;
        let suspicious = self.store.find_by_status(FraudStatus::Suspicious).await?;

        let fraud_rate_percent = if all.is_empty() {
            0.0
        } else {
            (fraud.len() as f64 * 100.0) / all.len() as f64
        };

        Ok(FraudSummary {
            total_transactions: all.len(),
            fraud_transactions: fraud.len(),
            suspicious_transactions: suspicious.len(),
            fraud_rate_percent,
        })
    }

    /// Count of FRAUD transactions per location.
    pub async fn fraud_by_location(&self) -> anyhow::Result<HashMap<String, u64>> {
        let fraud = self.store.find_by_status(FraudStatus::Fraud).await?;

        let mut map: HashMap<String, u64> = HashMap::new();
        for tx in fraud {
            *map.entry(tx.location).or_insert(0) += 1;
        }

        Ok(map)
    }

    /// Write all transactions as CSV training data and return the path.
    ///
    /// Columns: amount, location, riskScore, status. Unscored
    /// transactions export a 0 score and an empty status. Locations
    /// are quoted when they contain CSV metacharacters.
    pub async fn export_training_data(&self, path: &Path) -> anyhow::Result<PathBuf> {
        let all = self.store.find_all().await?;

        let mut file = File::create(path)?;
        writeln!(file, "amount,location,riskScore,status")?;

        for tx in all {
            writeln!(
                file,
                "{},{},{},{}",
                tx.amount,
                csv_field(&tx.location),
                tx.risk_score.unwrap_or(0),
                tx.status.map(|s| s.as_str()).unwrap_or(""),
            )?;
        }

        Ok(path.to_path_buf())
    }
}

/// Quote a CSV field when it contains a comma, quote, or newline;
/// internal quotes are doubled per RFC 4180.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewTransaction;
    use crate::storage::MemoryStore;
    use chrono::Utc;
    use rust_decimal::Decimal;

    async fn seed_scored(
        store: &MemoryStore,
        location: &str,
        score: u8,
        status: FraudStatus,
    ) {
        let tx = store
            .insert(&NewTransaction::new(
                "A1",
                Decimal::new(100, 0),
                location,
                Utc::now(),
            ))
            .await
            .unwrap();
        store.update_assessment(tx.id, score, status).await.unwrap();
    }

    #[tokio::test]
    async fn test_fraud_summary() {
        let store = Arc::new(MemoryStore::new());
        let analytics = Analytics::new(store.clone());

        seed_scored(&store, "NY", 80, FraudStatus::Fraud).await;
        seed_scored(&store, "LA", 50, FraudStatus::Suspicious).await;
        seed_scored(&store, "NY", 10, FraudStatus::Normal).await;
        seed_scored(&store, "SF", 20, FraudStatus::Normal).await;

        let summary = analytics.fraud_summary().await.unwrap();

        assert_eq!(summary.total_transactions, 4);
        assert_eq!(summary.fraud_transactions, 1);
        assert_eq!(summary.suspicious_transactions, 1);
        assert!((summary.fraud_rate_percent - 25.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_fraud_summary_empty_store() {
        let store = Arc::new(MemoryStore::new());
        let analytics = Analytics::new(store);

        let summary = analytics.fraud_summary().await.unwrap();

        assert_eq!(summary.total_transactions, 0);
        assert_eq!(summary.fraud_rate_percent, 0.0);
    }

    #[tokio::test]
    async fn test_fraud_by_location() {
        let store = Arc::new(MemoryStore::new());
        let analytics = Analytics::new(store.clone());

        seed_scored(&store, "NY", 80, FraudStatus::Fraud).await;
        seed_scored(&store, "NY", 90, FraudStatus::Fraud).await;
        seed_scored(&store, "LA", 85, FraudStatus::Fraud).await;
        seed_scored(&store, "SF", 50, FraudStatus::Suspicious).await;

        let by_location = analytics.fraud_by_location().await.unwrap();

        assert_eq!(by_location.get("NY"), Some(&2));
        assert_eq!(by_location.get("LA"), Some(&1));
        // Suspicious transactions are not counted
        assert_eq!(by_location.get("SF"), None);
    }

    #[tokio::test]
    async fn test_export_training_data() {
        let store = Arc::new(MemoryStore::new());
        let analytics = Analytics::new(store.clone());

        seed_scored(&store, "NY", 65, FraudStatus::Suspicious).await;
        store
            .insert(&NewTransaction::new(
                "A2",
                Decimal::new(200, 0),
                "LA",
                Utc::now(),
            ))
            .await
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fraud-training-data.csv");

        let written = analytics.export_training_data(&path).await.unwrap();
        assert_eq!(written, path);

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();

        assert_eq!(lines[0], "amount,location,riskScore,status");
        assert_eq!(lines[1], "100,NY,65,SUSPICIOUS");
        // Unscored row exports a 0 score and empty status
        assert_eq!(lines[2], "200,LA,0,");
    }

    #[tokio::test]
    async fn test_export_quotes_location_with_comma() {
        let store = Arc::new(MemoryStore::new());
        let analytics = Analytics::new(store.clone());

        seed_scored(&store, "New York, NY", 65, FraudStatus::Suspicious).await;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.csv");
        analytics.export_training_data(&path).await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();

        // The comma stays inside one quoted field instead of splitting
        // the row into five columns
        assert_eq!(lines[1], "100,\"New York, NY\",65,SUSPICIOUS");
    }

    #[test]
    fn test_csv_field_escaping() {
        assert_eq!(csv_field("NY"), "NY");
        assert_eq!(csv_field("New York, NY"), "\"New York, NY\"");
        assert_eq!(csv_field("the \"docks\""), "\"the \"\"docks\"\"\"");
    }
}
