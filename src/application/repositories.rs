// Repository traits for local persistence
use crate::domain::error::ClientError;
use crate::domain::server::ServerRecord;
use crate::domain::settings::AppSettings;
use async_trait::async_trait;

/// Ordered list of tracked servers, stored in a single slot.
#[async_trait]
pub trait ServerStore: Send + Sync {
    async fn load(&self) -> Result<Vec<ServerRecord>, ClientError>;

    async fn save(&self, records: &[ServerRecord]) -> Result<(), ClientError>;
}

/// Key-value settings storage. A missing store yields defaults.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn load(&self) -> Result<AppSettings, ClientError>;

    async fn save(&self, settings: &AppSettings) -> Result<(), ClientError>;
}
