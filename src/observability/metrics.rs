use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crate::domain::{FraudStatus, RuleName};

/// Metrics registry for the scoring service.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Total scoring requests completed
    pub scores_total: AtomicU64,

    /// Scored transactions by resulting status
    pub status_normal: AtomicU64,
    pub status_suspicious: AtomicU64,
    pub status_fraud: AtomicU64,

    /// Rule fires by rule
    pub fires_high_amount: AtomicU64,
    pub fires_rapid: AtomicU64,
    pub fires_location_mismatch: AtomicU64,
    pub fires_night_time: AtomicU64,

    /// Plugin calls that failed (contribution treated as 0)
    pub plugin_failures_total: AtomicU64,

    /// Evaluations aborted by a data-access failure
    pub data_access_failures_total: AtomicU64,

    /// Scoring latency buckets (microseconds)
    pub latency_under_1ms: AtomicU64,
    pub latency_1_5ms: AtomicU64,
    pub latency_5_10ms: AtomicU64,
    pub latency_10_50ms: AtomicU64,
    pub latency_50_100ms: AtomicU64,
    pub latency_over_100ms: AtomicU64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        MetricsRegistry::default()
    }

    /// Record a completed scoring with its resulting status.
    pub fn record_status(&self, status: FraudStatus) {
        self.scores_total.fetch_add(1, Ordering::Relaxed);

        match status {
            FraudStatus::Normal => {
                self.status_normal.fetch_add(1, Ordering::Relaxed);
            }
            FraudStatus::Suspicious => {
                self.status_suspicious.fetch_add(1, Ordering::Relaxed);
            }
            FraudStatus::Fraud => {
                self.status_fraud.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Record one rule firing.
    pub fn record_rule_fire(&self, rule: RuleName) {
        match rule {
            RuleName::HighAmountTransaction => {
                self.fires_high_amount.fetch_add(1, Ordering::Relaxed);
            }
            RuleName::RapidMultipleTransactions => {
                self.fires_rapid.fetch_add(1, Ordering::Relaxed);
            }
            RuleName::LocationMismatch => {
                self.fires_location_mismatch.fetch_add(1, Ordering::Relaxed);
            }
            RuleName::NightTimeTransaction => {
                self.fires_night_time.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn record_plugin_failure(&self) {
        self.plugin_failures_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_data_access_failure(&self) {
        self.data_access_failures_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record scoring latency.
    pub fn record_latency(&self, start: Instant) {
        let micros = start.elapsed().as_micros() as u64;

        if micros < 1000 {
            self.latency_under_1ms.fetch_add(1, Ordering::Relaxed);
        } else if micros < 5000 {
            self.latency_1_5ms.fetch_add(1, Ordering::Relaxed);
        } else if micros < 10000 {
            self.latency_5_10ms.fetch_add(1, Ordering::Relaxed);
        } else if micros < 50000 {
            self.latency_10_50ms.fetch_add(1, Ordering::Relaxed);
        } else if micros < 100000 {
            self.latency_50_100ms.fetch_add(1, Ordering::Relaxed);
        } else {
            self.latency_over_100ms.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Export metrics in Prometheus text format.
    pub fn to_prometheus(&self) -> String {
        format!(
            r#"# HELP frisk_scores_total Total scoring requests completed
# TYPE frisk_scores_total counter
frisk_scores_total {}

# HELP frisk_scores Scored transactions by status
# TYPE frisk_scores counter
frisk_scores{{status="normal"}} {}
frisk_scores{{status="suspicious"}} {}
frisk_scores{{status="fraud"}} {}

# HELP frisk_rule_fires Rule fires by rule
# TYPE frisk_rule_fires counter
frisk_rule_fires{{rule="high_amount"}} {}
frisk_rule_fires{{rule="rapid_multiple"}} {}
frisk_rule_fires{{rule="location_mismatch"}} {}
frisk_rule_fires{{rule="night_time"}} {}

# HELP frisk_plugin_failures_total Plugin calls that failed
# TYPE frisk_plugin_failures_total counter
frisk_plugin_failures_total {}

# HELP frisk_data_access_failures_total Evaluations aborted by data-access failures
# TYPE frisk_data_access_failures_total counter
frisk_data_access_failures_total {}

# HELP frisk_score_latency_bucket Scoring latency histogram
# TYPE frisk_score_latency_bucket counter
frisk_score_latency_bucket{{le="0.001"}} {}
frisk_score_latency_bucket{{le="0.005"}} {}
frisk_score_latency_bucket{{le="0.01"}} {}
frisk_score_latency_bucket{{le="0.05"}} {}
frisk_score_latency_bucket{{le="0.1"}} {}
frisk_score_latency_bucket{{le="+Inf"}} {}
"#,
            self.scores_total.load(Ordering::Relaxed),
            self.status_normal.load(Ordering::Relaxed),
            self.status_suspicious.load(Ordering::Relaxed),
            self.status_fraud.load(Ordering::Relaxed),
            self.fires_high_amount.load(Ordering::Relaxed),
            self.fires_rapid.load(Ordering::Relaxed),
            self.fires_location_mismatch.load(Ordering::Relaxed),
            self.fires_night_time.load(Ordering::Relaxed),
            self.plugin_failures_total.load(Ordering::Relaxed),
            self.data_access_failures_total.load(Ordering::Relaxed),
            self.latency_under_1ms.load(Ordering::Relaxed),
            self.latency_1_5ms.load(Ordering::Relaxed),
            self.latency_5_10ms.load(Ordering::Relaxed),
            self.latency_10_50ms.load(Ordering::Relaxed),
            self.latency_50_100ms.load(Ordering::Relaxed),
            self.latency_over_100ms.load(Ordering::Relaxed),
        )
    }
}
