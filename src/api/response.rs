use serde::Serialize;

use crate::domain::{FraudStatus, RuleName, TransactionId};
use crate::engine::Assessment;

/// One fired rule in a scoring response.
#[derive(Debug, Serialize)]
pub struct FiredRuleResponse {
    pub rule: RuleName,
    pub cumulative_score: u32,
}

/// Response from scoring a submitted transaction.
#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub id: TransactionId,
    pub base_score: u32,
    pub risk_score: u8,
    pub status: FraudStatus,
    pub fired_rules: Vec<FiredRuleResponse>,
}

impl ScoreResponse {
    pub fn new(id: TransactionId, assessment: Assessment) -> Self {
        ScoreResponse {
            id,
            base_score: assessment.base_score,
            risk_score: assessment.final_score,
            status: assessment.status,
            fired_rules: assessment
                .fired
                .into_iter()
                .map(|f| FiredRuleResponse {
                    rule: f.rule,
                    cumulative_score: f.cumulative_score,
                })
                .collect(),
        }
    }
}

/// Response from the CSV export endpoint.
#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub path: String,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// Readiness check response.
#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    pub ready: bool,
    pub rules_loaded: usize,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        ErrorResponse {
            error: error.into(),
            code: code.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ErrorResponse::new(message, "BAD_REQUEST")
    }

    pub fn data_access(message: impl Into<String>) -> Self {
        ErrorResponse::new(message, "DATA_ACCESS")
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ErrorResponse::new(message, "NOT_FOUND")
    }
}
