use mimalloc::MiMalloc;
use passenger_hub::config::{ApiConfig, mask};
use passenger_hub::router::{HubState, hub_router};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = ApiConfig::load()?;
    passenger_hub::telemetry::init(&cfg.loglevel);

    info!(
        db_host = %cfg.db_host,
        db_port = cfg.db_port,
        db_name = %cfg.db_name,
        db_user = %cfg.db_user,
        db_password = mask(&cfg.db_password),
        pool_max_connections = cfg.db_pool_max_connections,
        loglevel = %cfg.loglevel
    );

    let state = HubState::from_config(&cfg);
    let pool = state.storage.pool().clone();
    let app = hub_router(state);

    let listener = TcpListener::bind(&cfg.listen_addr).await?;
    info!("HTTP server listening on {}", cfg.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
