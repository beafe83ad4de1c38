use thiserror::Error;

/// Failure surfaced by a scoring attempt.
///
/// Only data-access failures abort an evaluation: the transaction is
/// left unscored and the caller may retry the whole call. Plugin
/// failures never abort (the contribution is treated as 0 and the
/// failure logged), and an enabled ML flag with no plugin bound
/// behaves exactly like the flag being off.
#[derive(Debug, Error)]
pub enum ScoreError {
    /// A context query or audit-log append failed. Retryable.
    #[error("data access failure: {0}")]
    DataAccess(#[source] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_carries_source() {
        let err = ScoreError::DataAccess(anyhow::anyhow!("connection refused"));
        assert_eq!(err.to_string(), "data access failure: connection refused");
    }
}
