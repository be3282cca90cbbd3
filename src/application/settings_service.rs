// Settings service - Typed access to persisted user settings
use crate::application::repositories::SettingsStore;
use crate::domain::error::ClientError;
use crate::domain::settings::{AppSettings, RefreshInterval, SharedSettings};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct SettingsService {
    store: Arc<dyn SettingsStore>,
    shared: SharedSettings,
    // Serializes read-modify-save-publish so concurrent setters never drop a change
    write_lock: Arc<Mutex<()>>,
}

impl SettingsService {
    pub fn new(store: Arc<dyn SettingsStore>, shared: SharedSettings) -> Self {
        Self {
            store,
            shared,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Re-read persisted settings; falls back to defaults when unreadable.
    pub async fn reload(&self) -> AppSettings {
        let _guard = self.write_lock.lock().await;
        let settings = match self.store.load().await {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Could not read settings, using defaults: {}", e);
                AppSettings::default()
            }
        };
        self.shared.replace(settings.clone());
        settings
    }

    pub fn current(&self) -> AppSettings {
        self.shared.get()
    }

    pub fn shared(&self) -> SharedSettings {
        self.shared.clone()
    }

    pub async fn set_show_player_count(&self, value: bool) -> Result<AppSettings, ClientError> {
        self.update(|s| s.show_player_count = value).await
    }

    pub async fn set_show_motd(&self, value: bool) -> Result<AppSettings, ClientError> {
        self.update(|s| s.show_motd = value).await
    }

    pub async fn set_blur_ip_address(&self, value: bool) -> Result<AppSettings, ClientError> {
        self.update(|s| s.blur_ip_address = value).await
    }

    pub async fn set_auto_refresh(&self, value: bool) -> Result<AppSettings, ClientError> {
        self.update(|s| s.auto_refresh = value).await
    }

    pub async fn set_haptic_feedback(&self, value: bool) -> Result<AppSettings, ClientError> {
        self.update(|s| s.haptic_feedback = value).await
    }

    pub async fn set_refresh_interval(
        &self,
        value: RefreshInterval,
    ) -> Result<AppSettings, ClientError> {
        self.update(|s| s.refresh_interval = value).await
    }

    pub async fn set_history_server_url(
        &self,
        value: Option<String>,
    ) -> Result<AppSettings, ClientError> {
        let value = value
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());
        self.update(|s| s.history_server_url = value).await
    }

    async fn update(&self, apply: impl FnOnce(&mut AppSettings)) -> Result<AppSettings, ClientError> {
        let _guard = self.write_lock.lock().await;
        let mut settings = self.shared.get();
        apply(&mut settings);
        self.store.save(&settings).await?;
        self.shared.replace(settings.clone());
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::repositories::memory::MemorySettingsStore;
    use async_trait::async_trait;

    /// Settings store that yields before every save so setters interleave.
    #[derive(Default)]
    struct YieldingStore {
        inner: MemorySettingsStore,
    }

    #[async_trait]
    impl SettingsStore for YieldingStore {
        async fn load(&self) -> Result<AppSettings, ClientError> {
            self.inner.load().await
        }

        async fn save(&self, settings: &AppSettings) -> Result<(), ClientError> {
            tokio::task::yield_now().await;
            self.inner.save(settings).await
        }
    }

    #[tokio::test]
    async fn test_concurrent_setters_keep_both_changes() {
        let store = Arc::new(YieldingStore::default());
        let service = SettingsService::new(store.clone(), SharedSettings::default());

        let (a, b) = tokio::join!(
            service.set_auto_refresh(true),
            service.set_blur_ip_address(true)
        );
        a.unwrap();
        b.unwrap();

        let current = service.current();
        assert!(current.auto_refresh);
        assert!(current.blur_ip_address);

        let persisted = store.inner.settings.lock().unwrap().clone().unwrap();
        assert_eq!(persisted, current);
    }

    #[tokio::test]
    async fn test_setters_persist_and_publish() {
        let store = Arc::new(MemorySettingsStore::default());
        let shared = SharedSettings::default();
        let service = SettingsService::new(store.clone(), shared.clone());

        service.set_auto_refresh(true).await.unwrap();
        service.set_refresh_interval(RefreshInterval::Seconds300).await.unwrap();

        let persisted = store.settings.lock().unwrap().clone().unwrap();
        assert!(persisted.auto_refresh);
        assert_eq!(persisted.refresh_interval, RefreshInterval::Seconds300);
        assert!(shared.get().auto_refresh);
    }

    #[tokio::test]
    async fn test_history_url_is_normalized() {
        let service = SettingsService::new(
            Arc::new(MemorySettingsStore::default()),
            SharedSettings::default(),
        );

        let settings = service
            .set_history_server_url(Some(" https://h.example.net/ ".into()))
            .await
            .unwrap();
        assert_eq!(settings.history_server_url.as_deref(), Some("https://h.example.net"));

        let settings = service.set_history_server_url(Some("".into())).await.unwrap();
        assert_eq!(settings.history_server_url, None);
    }

    #[tokio::test]
    async fn test_reload_reads_store() {
        let store = Arc::new(MemorySettingsStore::default());
        *store.settings.lock().unwrap() = Some(AppSettings {
            show_motd: false,
            ..AppSettings::default()
        });

        let service = SettingsService::new(store, SharedSettings::default());
        assert!(service.current().show_motd);
        assert!(!service.reload().await.show_motd);
        assert!(!service.current().show_motd);
    }
}
