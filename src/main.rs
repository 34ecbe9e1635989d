use anyhow::Result;
use cryptofi_api::api::start_server;
use cryptofi_api::logging;
use cryptofi_api::{ensure_tables_and_seed, AppConfig, Database};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    logging::init("info");

    let config = AppConfig::from_env();
    info!(
        server_address = %config.server_address,
        scan_page_size = config.storage.scan_page_size,
        storage_region = config.storage.region.as_deref().unwrap_or("none"),
        "Configuration loaded"
    );

    let db = Database::connect(&config.storage).await?;
    let report = ensure_tables_and_seed(&db, &config.seed).await?;
    info!(?report, "Storage ready");

    let db = Arc::new(db);
    let result = start_server(db.clone(), &config.server_address).await;
    db.close().await;
    result
}
