//! Claimq Daemon - Main Entry Point
//! Composition root: storage, product creator, access gate, RPC server, purge loop

mod config;

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use claimq_api_rpc::{RpcServer, RpcServerConfig};
use claimq_core::application::{
    shutdown_channel, ClaimService, EventBus, MaintenanceScheduler, TracingEventHandler,
};
use claimq_core::memory::{MemoryAssignmentRepository, MemoryTransientStore};
use claimq_core::port::{
    AssignmentRepository, ProductCreator, SharedSecretGate, SystemTimeProvider, TimeProvider,
    TransientStore,
};
use claimq_infra_sqlite::{
    create_pool, run_migrations, SqliteAssignmentRepository, SqliteTransientStore,
};
use claimq_infra_woocommerce::{LocalProductCreator, WooCommerceConfig, WooCommerceProductCreator};
use config::{DaemonConfig, StorageConfig};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const LOCAL_SHOP_URL: &str = "http://localhost";

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize logging
    let log_format = std::env::var("CLAIMQ_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("claimq=info"))?;

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }

    info!("Claimq daemon v{} starting...", VERSION);

    // 2. Load configuration
    let config = DaemonConfig::from_env().map_err(|e| anyhow::anyhow!("{}", e))?;

    // 3. Storage adapters
    let time_provider: Arc<dyn TimeProvider> = Arc::new(SystemTimeProvider);
    let (transients, assignments): (Arc<dyn TransientStore>, Arc<dyn AssignmentRepository>) =
        match &config.storage {
            StorageConfig::Memory => {
                info!("Using in-memory storage (state is lost on exit)");
                (
                    Arc::new(MemoryTransientStore::new(time_provider.clone())),
                    Arc::new(MemoryAssignmentRepository::new()),
                )
            }
            StorageConfig::Sqlite(db_path) => {
                info!(db_path = %db_path, "Initializing database...");

                if let Some(parent) = Path::new(db_path).parent() {
                    tokio::fs::create_dir_all(parent).await?;
                }

                let pool = create_pool(&format!("sqlite://{}", db_path))
                    .await
                    .map_err(|e| anyhow::anyhow!("DB pool creation failed: {}", e))?;
                run_migrations(&pool)
                    .await
                    .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;

                (
                    Arc::new(SqliteTransientStore::new(pool.clone(), time_provider.clone())),
                    Arc::new(SqliteAssignmentRepository::new(pool)),
                )
            }
        };

    // 4. Product creator
    let creator: Arc<dyn ProductCreator> = match &config.woocommerce {
        Some(wc) => {
            info!(base_url = %wc.base_url, "Creating products through WooCommerce");
            let wc_config =
                WooCommerceConfig::new(&wc.base_url, &wc.consumer_key, &wc.consumer_secret);
            Arc::new(
                WooCommerceProductCreator::new(wc_config)
                    .map_err(|e| anyhow::anyhow!("WooCommerce client setup failed: {}", e))?,
            )
        }
        None => {
            info!("No WooCommerce credentials, using local product ids");
            Arc::new(LocalProductCreator::new(LOCAL_SHOP_URL, 1))
        }
    };

    if config.nonce.is_none() {
        tracing::warn!("CLAIMQ_NONCE is not set, nonce checks are disabled");
    }
    let gate = Arc::new(SharedSecretGate::new(
        config.nonce.clone(),
        config.allowed_users.clone(),
    ));

    // 5. Service wiring
    let events = EventBus::builder()
        .on_all(Arc::new(TracingEventHandler))
        .build();

    let service = Arc::new(
        ClaimService::new(
            transients.clone(),
            assignments,
            creator,
            gate,
            time_provider,
            events,
        )
        .with_queue_ttl(config.queue_ttl_ms()),
    );

    // 6. Start JSON-RPC server
    let rpc_config = RpcServerConfig {
        host: config.rpc_host.clone(),
        port: config.rpc_port,
    };
    let (addr, rpc_handle) = RpcServer::new(rpc_config, service)
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;

    // 7. Purge loop for expired queues
    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let scheduler = MaintenanceScheduler::new(transients, config.purge_interval);
    let maintenance_handle = tokio::spawn(scheduler.run(shutdown_rx));

    info!(addr = %addr, "System ready");
    info!("Press Ctrl+C to shutdown");

    // 8. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    shutdown_tx.shutdown();
    rpc_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), maintenance_handle).await;

    info!("Shutdown complete.");

    Ok(())
}
