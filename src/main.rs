// Main entry point - Dependency injection and headless monitoring loop
use std::pin::Pin;
use std::sync::Arc;

use anyhow::Context;
use futures::Stream;
use tokio_stream::{StreamExt, StreamMap};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use mcstatus_monitor::application::settings_service::SettingsService;
use mcstatus_monitor::application::status_client::{StatusClient, StatusClientOptions};
use mcstatus_monitor::domain::settings::SharedSettings;
use mcstatus_monitor::infrastructure::config::load_monitor_config;
use mcstatus_monitor::infrastructure::json_server_store::JsonServerStore;
use mcstatus_monitor::infrastructure::reqwest_transport::ReqwestTransport;
use mcstatus_monitor::infrastructure::toml_settings_store::TomlSettingsStore;
use mcstatus_monitor::presentation::server_card::ServerCardView;
use mcstatus_monitor::{AppController, RefreshMode, RefreshState};

type StateStream = Pin<Box<dyn Stream<Item = RefreshState> + Send>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = load_monitor_config().context("Failed to load configuration")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();

    // Create infrastructure
    let shared_settings = SharedSettings::default();
    let transport = Arc::new(ReqwestTransport::new().context("Failed to build HTTP client")?);
    let client = Arc::new(StatusClient::new(
        transport,
        shared_settings.clone(),
        StatusClientOptions::from(&config),
    ));
    let settings = SettingsService::new(
        Arc::new(TomlSettingsStore::new(&config.storage.settings_path)),
        shared_settings,
    );
    let server_store = Arc::new(JsonServerStore::new(&config.storage.servers_path));

    // Create controller (presentation layer)
    let controller = AppController::new(client, settings, server_store);
    controller
        .start()
        .await
        .context("Failed to load tracked servers")?;

    let servers = controller.servers().await;
    if servers.is_empty() {
        tracing::warn!(
            "No servers to monitor, add some to {}",
            config.storage.servers_path.display()
        );
        return Ok(());
    }
    tracing::info!("Monitoring {} servers", servers.len());

    let mut changes: StreamMap<Uuid, StateStream> = StreamMap::new();
    for coordinator in controller.coordinators() {
        changes.insert(coordinator.id(), Box::pin(coordinator.changes()));
    }

    controller.refresh_all(RefreshMode::Foreground).await;
    if !controller.is_auto_refreshing() {
        controller.force_auto_refresh();
    }

    loop {
        tokio::select! {
            Some((id, state)) = changes.next() => {
                if state.is_loading() {
                    continue;
                }
                if let Some(card) = controller.card(id) {
                    log_card(&card);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down");
                break;
            }
        }
    }

    controller.on_background();
    Ok(())
}

fn log_card(card: &ServerCardView) {
    let players = card.players_label.as_deref().unwrap_or("-");
    let motd = card.motd.as_deref().unwrap_or("").replace('\n', " | ");

    match &card.error {
        Some(error) if card.stale => {
            tracing::warn!("{} ({}): {} [showing last known: {}]", card.title, card.address_label, error, players)
        }
        Some(error) => tracing::warn!("{} ({}): {}", card.title, card.address_label, error),
        None => tracing::info!(
            "{} ({}): {:?} players={} version={} motd={}",
            card.title,
            card.address_label,
            card.indicator,
            players,
            card.version.as_deref().unwrap_or("?"),
            motd
        ),
    }
}
