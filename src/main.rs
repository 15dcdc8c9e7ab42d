use std::sync::Arc;

use clap::Parser;
use medicycle::adapters::lookup::ProductCatalog;
use medicycle::adapters::rxnorm::RxNormClient;
use medicycle::adapters::sqlite::SqliteInventory;
use medicycle::adapters::virustotal::VirusTotalClient;
use medicycle::utils::{logger, validation::Validate};
use medicycle::{build_router, AppConfig, AppState, CliConfig, Gs1DecodeOptions, ScanService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(cli.verbose);

    tracing::info!("Starting medicycle");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 載入並驗證配置（檔案可選，CLI 參數優先）
    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let listen = cli.listen.clone().unwrap_or_else(|| config.listen_addr());
    let db_path = cli.db_path.clone().unwrap_or_else(|| config.database_path());
    if config.virustotal_api_key().is_empty() {
        tracing::warn!("⚠️ VirusTotal API key not configured; /api/check-url will be rejected");
    }

    // 建立存儲、上游客戶端與服務
    let inventory = SqliteInventory::open(&db_path)?;
    tracing::info!("📦 Inventory database: {}", db_path);

    let rxnorm = RxNormClient::new(config.rxnorm_base_url(), config.rxnorm_timeout())?;
    let virustotal = VirusTotalClient::new(
        config.virustotal_base_url(),
        config.virustotal_api_key(),
        config.virustotal_timeout(),
        config.virustotal_poll_delay(),
    )?;

    let catalog = match cli.catalog.as_deref() {
        Some(path) => ProductCatalog::from_file(path)?,
        None => match config.catalog_path() {
            Some(path) => ProductCatalog::from_file(path)?,
            None => ProductCatalog::default(),
        },
    };
    if !catalog.is_empty() {
        tracing::info!("📒 Product catalog loaded: {} entries", catalog.len());
    }
    let catalog = Arc::new(catalog);

    let gs1_options = Gs1DecodeOptions {
        strict_gtin: config.strict_gtin(),
    };
    let scans = Arc::new(ScanService::new(
        inventory.clone(),
        rxnorm,
        catalog.as_ref().clone(),
        config.min_shelf_life_days(),
        gs1_options,
    ));

    let state = AppState {
        inventory,
        scans,
        url_scanner: Arc::new(virustotal),
        catalog,
        min_shelf_life_days: config.min_shelf_life_days(),
        gs1_options,
    };

    // 啟動 HTTP 服務
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(&listen).await?;
    tracing::info!("✅ Listening on http://{}", listen);
    axum::serve(listener, app).await?;

    Ok(())
}
