use mimalloc::MiMalloc;
use passenger_hub::config::{ImporterConfig, mask};
use passenger_hub::service::importer::{self, ImportOutcome};
use tracing::{info, warn};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = ImporterConfig::load()?;
    passenger_hub::telemetry::init(&cfg.loglevel);

    info!("data importer started");
    info!(
        database = %cfg.mysql_database,
        app_user = cfg.mysql_user.as_deref().unwrap_or("<none>"),
        root_password = mask(&cfg.mysql_root_password),
        csv_path = %cfg.csv_path
    );

    let report = importer::run(&cfg).await;
    match &report.outcome {
        ImportOutcome::Loaded { inserted, total } => {
            info!(inserted, total, "import complete");
        }
        ImportOutcome::ConnectFailed(_) => warn!("import skipped: no connection"),
        ImportOutcome::SchemaFailed(_) => warn!("import aborted: table could not be created"),
        ImportOutcome::LoadFailed(_) => warn!("import finished without loading data"),
    }
    if report.truncate_error.is_some() {
        warn!(truncate_failed = true, "previous rows were not cleared before loading");
    }

    info!("data importer finished");
    Ok(())
}
