//! STAMPalooza Player - composition root binary.

use std::sync::Arc;

use anyhow::Result;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stampalooza_player::application::api::Api;
use stampalooza_player::application::services::GameService;
use stampalooza_player::config::PlayerConfig;
use stampalooza_player::infrastructure::{
    FileSnapshotStore, ReqwestApiAdapter, SeededRandom, SystemClock,
};
use stampalooza_player::ui::TerminalUi;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stampalooza_player=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting STAMPalooza Player");

    let config = PlayerConfig::from_env()?;
    tracing::info!(api_url = %config.api_url, seed = ?config.seed, "Configuration loaded");

    // HTTP
    let raw_api = Arc::new(ReqwestApiAdapter::new(&config.api_url, config.http_timeout)?);
    let api = Api::new(raw_api);
    match api.health().await {
        Ok(health) if health.is_healthy() => tracing::info!("Backend is healthy"),
        Ok(health) => tracing::warn!(status = %health.status, "Backend reports degraded health"),
        Err(e) => tracing::warn!(error = %e, "Backend unreachable, playing offline"),
    }

    // Persistence
    let storage_path = config
        .storage_path
        .clone()
        .unwrap_or_else(FileSnapshotStore::default_path);
    let store = Arc::new(FileSnapshotStore::new(storage_path));

    let mut service = GameService::boot(
        api,
        store,
        Arc::new(SystemClock::new()),
        Box::new(SeededRandom::new(config.seed)),
        config.game,
    )
    .await;

    let mut ui = TerminalUi::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout());
    ui.run(&mut service).await?;

    tracing::info!("STAMPalooza Player stopped");
    Ok(())
}
