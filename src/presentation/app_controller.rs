// Application controller - Owns the services and drives them from lifecycle events
use crate::application::auto_refresh::AutoRefreshScheduler;
use crate::application::coordinator_pool::CoordinatorPool;
use crate::application::history_service::{HistoryChart, HistoryService};
use crate::application::refresh_coordinator::{RefreshCoordinator, RefreshMode, RefreshOutcome};
use crate::application::repositories::ServerStore;
use crate::application::server_registry::ServerRegistry;
use crate::application::settings_service::SettingsService;
use crate::application::status_client::StatusClient;
use crate::domain::error::ClientError;
use crate::domain::history::TimeWindow;
use crate::domain::server::ServerRecord;
use crate::domain::settings::{AppSettings, RefreshInterval};
use crate::presentation::server_card::ServerCardView;
use futures::future::join_all;
use std::sync::Arc;
use uuid::Uuid;

pub struct AppController {
    client: Arc<StatusClient>,
    settings: SettingsService,
    registry: ServerRegistry,
    pool: Arc<CoordinatorPool>,
    scheduler: AutoRefreshScheduler,
    history: HistoryService,
}

impl AppController {
    pub fn new(
        client: Arc<StatusClient>,
        settings: SettingsService,
        server_store: Arc<dyn ServerStore>,
    ) -> Self {
        let pool = Arc::new(CoordinatorPool::new());
        Self {
            registry: ServerRegistry::new(server_store, client.clone()),
            scheduler: AutoRefreshScheduler::new(pool.clone()),
            history: HistoryService::new(client.clone()),
            client,
            settings,
            pool,
        }
    }

    /// Load settings and servers, then behave as if the app came to the foreground.
    pub async fn start(&self) -> Result<(), ClientError> {
        let records = self.registry.load().await?;
        for record in records {
            self.track(record);
        }
        self.on_foreground().await;
        Ok(())
    }

    /// Re-read settings and re-arm auto refresh from them.
    pub async fn on_foreground(&self) {
        let settings = self.settings.reload().await;
        self.apply_schedule(&settings);
    }

    pub fn on_background(&self) {
        self.scheduler.stop();
    }

    /// Run auto refresh at the configured interval regardless of the stored
    /// toggle. Nothing is persisted.
    pub fn force_auto_refresh(&self) {
        let interval = self.settings.current().refresh_interval;
        self.scheduler.start(interval.as_duration());
    }

    pub fn settings(&self) -> &SettingsService {
        &self.settings
    }

    pub fn is_auto_refreshing(&self) -> bool {
        self.scheduler.is_running()
    }

    pub async fn servers(&self) -> Vec<ServerRecord> {
        self.registry.list().await
    }

    pub fn coordinator(&self, id: Uuid) -> Option<Arc<RefreshCoordinator>> {
        self.pool.get(id)
    }

    pub fn coordinators(&self) -> Vec<Arc<RefreshCoordinator>> {
        self.pool.snapshot()
    }

    pub fn card(&self, id: Uuid) -> Option<ServerCardView> {
        let settings = self.settings.current();
        self.pool
            .get(id)
            .map(|c| ServerCardView::from_coordinator(&c, &settings))
    }

    pub fn cards(&self) -> Vec<ServerCardView> {
        let settings = self.settings.current();
        self.pool
            .snapshot()
            .iter()
            .map(|c| ServerCardView::from_coordinator(c, &settings))
            .collect()
    }

    pub async fn add_server(&self, record: ServerRecord) -> Result<Arc<RefreshCoordinator>, ClientError> {
        let record = self.registry.add(record).await?;
        let coordinator = self.track(record);
        self.spawn_refresh(coordinator.clone(), RefreshMode::Foreground);
        Ok(coordinator)
    }

    pub async fn edit_server(&self, record: ServerRecord) -> Result<(), ClientError> {
        let previous = self.registry.edit(record.clone()).await?;

        match self.pool.get(record.id) {
            Some(coordinator) => {
                coordinator.update_record(record.clone());
                if previous.address != record.address
                    || previous.port != record.port
                    || previous.variant != record.variant
                {
                    self.spawn_refresh(coordinator, RefreshMode::Foreground);
                }
            }
            None => {
                let coordinator = self.track(record);
                self.spawn_refresh(coordinator, RefreshMode::Foreground);
            }
        }

        Ok(())
    }

    pub async fn remove_server(&self, id: Uuid) -> Result<ServerRecord, ClientError> {
        let removed = self.registry.remove(id).await?;
        self.pool.remove(id);
        Ok(removed)
    }

    pub async fn move_server(&self, from: usize, to: usize) -> Result<(), ClientError> {
        let order = self.registry.reorder(from, to).await?;
        let ids: Vec<Uuid> = order.iter().map(|r| r.id).collect();
        self.pool.reorder(&ids);
        Ok(())
    }

    pub async fn refresh(&self, id: Uuid, mode: RefreshMode) -> Option<RefreshOutcome> {
        let coordinator = self.pool.get(id)?;
        Some(coordinator.refresh(mode).await)
    }

    /// Refresh every tracked server concurrently and wait for all of them.
    pub async fn refresh_all(&self, mode: RefreshMode) -> Vec<RefreshOutcome> {
        let coordinators = self.pool.snapshot();
        join_all(coordinators.iter().map(|c| c.refresh(mode))).await
    }

    pub async fn history_chart(&self, id: Uuid, window: TimeWindow) -> Result<HistoryChart, ClientError> {
        let record = self
            .registry
            .get(id)
            .await
            .ok_or_else(|| ClientError::InvalidRecord(format!("Unknown server {}", id)))?;
        self.history
            .load_chart(&record.address, record.port, window)
            .await
    }

    pub async fn set_auto_refresh(&self, enabled: bool) -> Result<(), ClientError> {
        let settings = self.settings.set_auto_refresh(enabled).await?;
        self.apply_schedule(&settings);
        Ok(())
    }

    pub async fn set_refresh_interval(&self, interval: RefreshInterval) -> Result<(), ClientError> {
        let settings = self.settings.set_refresh_interval(interval).await?;
        self.apply_schedule(&settings);
        Ok(())
    }

    /// Save a new history server URL after checking it answers `/health`.
    /// Clearing the URL always succeeds. Returns `false` when the URL was
    /// rejected and nothing was saved.
    pub async fn set_history_server_url(&self, url: Option<String>) -> Result<bool, ClientError> {
        if let Some(url) = url.as_deref().filter(|u| !u.trim().is_empty()) {
            if !self.client.validate_base_url(url).await {
                tracing::info!("History server {} failed validation", url);
                return Ok(false);
            }
        }

        self.settings.set_history_server_url(url).await?;
        Ok(true)
    }

    fn apply_schedule(&self, settings: &AppSettings) {
        self.scheduler
            .reconfigure(settings.auto_refresh, settings.refresh_interval.as_duration());
    }

    fn track(&self, record: ServerRecord) -> Arc<RefreshCoordinator> {
        let coordinator = Arc::new(RefreshCoordinator::new(record, self.client.clone()));
        self.pool.insert(coordinator.clone());
        coordinator
    }

    fn spawn_refresh(&self, coordinator: Arc<RefreshCoordinator>, mode: RefreshMode) {
        tokio::spawn(async move {
            coordinator.refresh(mode).await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::http_transport::mock::MockTransport;
    use crate::application::http_transport::HttpResponse;
    use crate::application::refresh_coordinator::RefreshState;
    use crate::application::repositories::memory::{MemoryServerStore, MemorySettingsStore};
    use crate::application::status_client::StatusClientOptions;
    use crate::domain::server::ServerVariant;
    use crate::domain::settings::SharedSettings;
    use crate::presentation::server_card::CardIndicator;
    use serde_json::json;
    use std::time::Duration;

    struct Fixture {
        controller: AppController,
        transport: Arc<MockTransport>,
        settings_store: Arc<MemorySettingsStore>,
        server_store: Arc<MemoryServerStore>,
    }

    fn fixture() -> Fixture {
        let transport = Arc::new(MockTransport::with_fallback(|request| {
            let body = if request.url.ends_with("/health") {
                json!({ "status": "ok" })
            } else if request.url.contains("/java/") {
                json!({ "online": true, "players": { "online": 2, "max": 10 } })
            } else {
                json!({ "success": true, "data": [] })
            };
            Ok(HttpResponse::new(200, body.to_string()))
        }));
        let shared = SharedSettings::default();
        let client = Arc::new(StatusClient::new(
            transport.clone(),
            shared.clone(),
            StatusClientOptions::default(),
        ));
        let settings_store = Arc::new(MemorySettingsStore::default());
        let server_store = Arc::new(MemoryServerStore::default());
        let controller = AppController::new(
            client,
            SettingsService::new(settings_store.clone(), shared),
            server_store.clone(),
        );

        Fixture {
            controller,
            transport,
            settings_store,
            server_store,
        }
    }

    fn record(name: &str) -> ServerRecord {
        ServerRecord::new(name.into(), format!("{}.example.net", name), None, ServerVariant::Java)
    }

    #[tokio::test]
    async fn test_start_tracks_stored_servers() {
        let f = fixture();
        f.server_store.records.lock().unwrap().push(record("a"));
        f.server_store.records.lock().unwrap().push(record("b"));

        f.controller.start().await.unwrap();
        assert_eq!(f.controller.coordinators().len(), 2);
        assert!(!f.controller.is_auto_refreshing());

        let outcomes = f.controller.refresh_all(RefreshMode::Foreground).await;
        assert_eq!(outcomes, vec![RefreshOutcome::Applied, RefreshOutcome::Applied]);
        assert!(f.controller.cards().iter().all(|c| c.indicator == CardIndicator::Online));
    }

    #[tokio::test]
    async fn test_lifecycle_hooks_drive_scheduler() {
        let f = fixture();
        *f.settings_store.settings.lock().unwrap() = Some(AppSettings {
            auto_refresh: true,
            refresh_interval: RefreshInterval::Seconds60,
            ..AppSettings::default()
        });

        f.controller.start().await.unwrap();
        assert!(f.controller.is_auto_refreshing());

        f.controller.on_background();
        assert!(!f.controller.is_auto_refreshing());

        f.controller.on_foreground().await;
        assert!(f.controller.is_auto_refreshing());

        f.controller.set_auto_refresh(false).await.unwrap();
        assert!(!f.controller.is_auto_refreshing());
    }

    #[tokio::test]
    async fn test_add_and_remove_server() {
        let f = fixture();
        f.controller.start().await.unwrap();

        let coordinator = f.controller.add_server(record("hub")).await.unwrap();
        let mut rx = coordinator.subscribe();
        tokio::time::timeout(Duration::from_secs(1), rx.wait_for(|s| matches!(s, RefreshState::Success(_))))
            .await
            .unwrap()
            .unwrap();

        let id = coordinator.id();
        assert!(f.controller.card(id).is_some());

        f.controller.remove_server(id).await.unwrap();
        assert!(f.controller.coordinator(id).is_none());
        assert!(f.server_store.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_history_url_is_validated_before_saving() {
        let f = fixture();
        f.transport.push_json(200, json!({ "status": "degraded" }));

        let saved = f
            .controller
            .set_history_server_url(Some("https://history.example.net".into()))
            .await
            .unwrap();
        assert!(!saved);
        assert!(f.settings_store.settings.lock().unwrap().is_none());

        let saved = f
            .controller
            .set_history_server_url(Some("https://history.example.net/".into()))
            .await
            .unwrap();
        assert!(saved);
        assert_eq!(
            f.controller.settings().current().history_server_url.as_deref(),
            Some("https://history.example.net")
        );
    }

    #[tokio::test]
    async fn test_history_chart_for_tracked_server() {
        let f = fixture();
        f.controller.start().await.unwrap();

        let missing = f.controller.history_chart(Uuid::new_v4(), TimeWindow::OneHour).await;
        assert!(matches!(missing, Err(ClientError::InvalidRecord(_))));

        let coordinator = f.controller.add_server(record("hub")).await.unwrap();
        let result = f.controller.history_chart(coordinator.id(), TimeWindow::OneHour).await;
        assert_eq!(result, Err(ClientError::HistoryNotConfigured));
    }
}
