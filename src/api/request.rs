use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::NewTransaction;

/// Request to submit and score a transaction.
#[derive(Debug, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub account_number: String,

    /// Monetary amount; must be non-negative
    pub amount: f64,

    pub location: String,

    /// When the transaction occurred; defaults to now
    #[serde(default)]
    pub transaction_time: Option<DateTime<Utc>>,
}

impl ScoreRequest {
    /// Convert to a NewTransaction for ingestion.
    ///
    /// Returns `None` when the amount is not a finite number that fits
    /// in a `Decimal` (NaN, infinities, and magnitudes beyond the
    /// Decimal range). Coercing such amounts would let an absurdly
    /// large transaction score as zero.
    pub fn to_new_transaction(&self) -> Option<NewTransaction> {
        if !self.amount.is_finite() {
            return None;
        }
        let amount = Decimal::from_f64_retain(self.amount)?;

        Some(NewTransaction::new(
            &self.account_number,
            amount,
            &self.location,
            self.transaction_time.unwrap_or_else(Utc::now),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_deserialization() {
        let json = r#"{
            "account_number": "A1",
            "amount": 60000.0,
            "location": "NY",
            "transaction_time": "2026-05-01T02:00:00Z"
        }"#;

        let req: ScoreRequest = serde_json::from_str(json).unwrap();

        assert_eq!(req.account_number, "A1");
        assert_eq!(req.amount, 60000.0);
        assert!(req.transaction_time.is_some());
    }

    #[test]
    fn test_transaction_time_defaults_to_now() {
        let json = r#"{
            "account_number": "A1",
            "amount": 100.0,
            "location": "NY"
        }"#;

        let req: ScoreRequest = serde_json::from_str(json).unwrap();
        let new_tx = req.to_new_transaction().unwrap();

        let age = Utc::now() - new_tx.transaction_time;
        assert!(age.num_seconds() < 5);
    }

    #[test]
    fn test_amount_converted_to_decimal() {
        let req = ScoreRequest {
            account_number: "A1".to_string(),
            amount: 1234.56,
            location: "NY".to_string(),
            transaction_time: None,
        };

        let new_tx = req.to_new_transaction().unwrap();
        assert_eq!(new_tx.amount, Decimal::from_f64_retain(1234.56).unwrap());
    }

    fn request_with_amount(amount: f64) -> ScoreRequest {
        ScoreRequest {
            account_number: "A1".to_string(),
            amount,
            location: "NY".to_string(),
            transaction_time: None,
        }
    }

    #[test]
    fn test_amount_beyond_decimal_range_is_rejected() {
        // 1e30 is a valid finite JSON number but exceeds what Decimal
        // can hold; it must not be coerced to zero and scored NORMAL.
        assert!(request_with_amount(1e30).to_new_transaction().is_none());
    }

    #[test]
    fn test_non_finite_amounts_are_rejected() {
        assert!(request_with_amount(f64::NAN).to_new_transaction().is_none());
        assert!(request_with_amount(f64::INFINITY)
            .to_new_transaction()
            .is_none());
        assert!(request_with_amount(f64::NEG_INFINITY)
            .to_new_transaction()
            .is_none());
    }
}
