use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::TransactionId;

/// Closed set of anomaly rules that can fire during evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleName {
    HighAmountTransaction,
    RapidMultipleTransactions,
    LocationMismatch,
    NightTimeTransaction,
}

impl RuleName {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleName::HighAmountTransaction => "HIGH_AMOUNT_TRANSACTION",
            RuleName::RapidMultipleTransactions => "RAPID_MULTIPLE_TRANSACTIONS",
            RuleName::LocationMismatch => "LOCATION_MISMATCH",
            RuleName::NightTimeTransaction => "NIGHT_TIME_TRANSACTION",
        }
    }
}

impl fmt::Display for RuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable audit record of one rule firing.
///
/// `risk_score` is the cumulative base score at the moment the rule
/// fired, not the rule's own contribution. Entries are appended by the
/// evaluator and never updated or removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FraudLog {
    /// Transaction this entry belongs to
    pub transaction_id: TransactionId,

    /// The rule that fired
    pub rule: RuleName,

    /// Cumulative base score after this rule's contribution
    pub risk_score: u32,

    /// When the entry was created
    pub created_at: DateTime<Utc>,
}

impl FraudLog {
    /// Create an entry for a rule firing at the given cumulative score.
    pub fn new(transaction_id: TransactionId, rule: RuleName, risk_score: u32) -> Self {
        FraudLog {
            transaction_id,
            rule,
            risk_score,
            created_at: Utc::now(),
        }
    }
}
