use serde::{Deserialize, Serialize};
use std::fmt;

/// Final score at or above this is classified FRAUD.
pub const FRAUD_THRESHOLD: u8 = 75;

/// Final score at or above this (and below [`FRAUD_THRESHOLD`]) is SUSPICIOUS.
pub const SUSPICIOUS_THRESHOLD: u8 = 35;

/// Fraud classification of a scored transaction.
///
/// Purely a function of the final risk score; carries no state of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FraudStatus {
    Normal,
    Suspicious,
    Fraud,
}

impl FraudStatus {
    /// Classify a final risk score.
    ///
    /// Total and deterministic: >=75 FRAUD, >=35 SUSPICIOUS, else NORMAL.
    #[inline]
    pub fn classify(score: u8) -> Self {
        if score >= FRAUD_THRESHOLD {
            FraudStatus::Fraud
        } else if score >= SUSPICIOUS_THRESHOLD {
            FraudStatus::Suspicious
        } else {
            FraudStatus::Normal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FraudStatus::Normal => "NORMAL",
            FraudStatus::Suspicious => "SUSPICIOUS",
            FraudStatus::Fraud => "FRAUD",
        }
    }

    /// Parse from string representation.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "NORMAL" => Some(FraudStatus::Normal),
            "SUSPICIOUS" => Some(FraudStatus::Suspicious),
            "FRAUD" => Some(FraudStatus::Fraud),
            _ => None,
        }
    }
}

impl fmt::Display for FraudStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
