use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use tokio::signal;
use tracing::info;

use frisk::analytics::Analytics;
use frisk::api::routes::{create_router, AppState};
use frisk::config::Config;
use frisk::engine::RiskEngine;
use frisk::observability::{init_tracing, MetricsRegistry};
use frisk::plugin::{FixedRiskPlugin, RiskPlugin};
use frisk::storage::{FraudLogStore, MemoryStore, PgStore, TransactionStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse configuration
    let config = Config::parse();

    // Initialize tracing
    init_tracing(&config.log_level);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting frisk scoring engine"
    );

    // Pick the storage backend
    let (store, audit): (Arc<dyn TransactionStore>, Arc<dyn FraudLogStore>) =
        if let Some(ref database_url) = config.database_url {
            let pg = PgStore::connect(database_url, config.db_max_connections).await?;
            pg.run_migrations().await?;
            let pg = Arc::new(pg);
            info!("Postgres store connected");
            (pg.clone(), pg)
        } else {
            let memory = Arc::new(MemoryStore::new());
            info!("Using in-memory store (no database configured)");
            (memory.clone(), memory)
        };

    let metrics = Arc::new(MetricsRegistry::new());

    // Resolve the optional risk plugin once at startup
    let mut engine = RiskEngine::new(store.clone(), audit.clone(), metrics.clone())
        .with_ml_enabled(config.ml_enabled);

    if let Some(score) = config.ml_fixed_score {
        let plugin: Arc<dyn RiskPlugin> = Arc::new(FixedRiskPlugin::new(score));
        info!(plugin = plugin.name(), score, "Risk plugin bound");
        engine = engine.with_plugin(plugin);
    } else if config.ml_enabled {
        info!("ML enabled but no plugin bound; contribution will be 0");
    }

    // Create application state
    let state = Arc::new(AppState {
        engine: Arc::new(engine),
        store: store.clone(),
        audit,
        analytics: Analytics::new(store),
        metrics,
        start_time: Instant::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        export_path: config.export_path.clone(),
    });

    // Create router
    let app = create_router(state);

    // Parse listen address
    let addr: SocketAddr = config.listen_addr.parse()?;

    info!(addr = %addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Run server with graceful shutdown
    if config.graceful_shutdown {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
    } else {
        axum::serve(listener, app).await?;
    }

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Received shutdown signal");
}
