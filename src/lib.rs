pub mod analytics;
pub mod api;
pub mod config;
pub mod domain;
pub mod engine;
pub mod observability;
pub mod plugin;
pub mod rules;
pub mod storage;

pub use config::Config;
pub use domain::{FraudLog, FraudStatus, RuleName, Transaction};
pub use engine::{Assessment, RiskEngine, ScoreError};
pub use rules::{AnomalyRule, RuleBattery};
