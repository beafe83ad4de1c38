use std::path::PathBuf;

use clap::Parser;

/// Fraud scoring service configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "frisk")]
#[command(about = "Rule-based fraud-risk scoring engine")]
pub struct Config {
    /// HTTP server listen address
    #[arg(long, default_value = "0.0.0.0:8080", env = "FRISK_LISTEN_ADDR")]
    pub listen_addr: String,

    /// Postgres connection string; in-memory store when unset
    #[arg(long, env = "FRISK_DATABASE_URL")]
    pub database_url: Option<String>,

    /// Maximum database connections
    #[arg(long, default_value = "10", env = "FRISK_DB_MAX_CONNECTIONS")]
    pub db_max_connections: u32,

    /// Enable the ML risk contribution
    #[arg(long, default_value = "false", env = "FRISK_ML_ENABLED")]
    pub ml_enabled: bool,

    /// Bind the fixed-score plugin with this contribution (stand-in scorer)
    #[arg(long, env = "FRISK_ML_FIXED_SCORE")]
    pub ml_fixed_score: Option<u32>,

    /// Path the CSV training-data export is written to
    #[arg(
        long,
        default_value = "fraud-training-data.csv",
        env = "FRISK_EXPORT_PATH"
    )]
    pub export_path: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    pub log_level: String,

    /// Enable graceful shutdown
    #[arg(long, default_value = "true", env = "FRISK_GRACEFUL_SHUTDOWN")]
    pub graceful_shutdown: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            listen_addr: "0.0.0.0:8080".to_string(),
            database_url: None,
            db_max_connections: 10,
            ml_enabled: false,
            ml_fixed_score: None,
            export_path: PathBuf::from("fraud-training-data.csv"),
            log_level: "info".to_string(),
            graceful_shutdown: true,
        }
    }
}
