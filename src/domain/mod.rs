pub mod fraud_log;
pub mod status;
pub mod transaction;

pub use fraud_log::{FraudLog, RuleName};
pub use status::{FraudStatus, FRAUD_THRESHOLD, SUSPICIOUS_THRESHOLD};
pub use transaction::{AccountNumber, NewTransaction, Transaction, TransactionId};
