// TOML file store for user settings
use crate::application::repositories::SettingsStore;
use crate::domain::error::ClientError;
use crate::domain::settings::AppSettings;
use async_trait::async_trait;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct TomlSettingsStore {
    path: PathBuf,
}

impl TomlSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SettingsStore for TomlSettingsStore {
    async fn load(&self) -> Result<AppSettings, ClientError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(AppSettings::default()),
            Err(e) => return Err(ClientError::Storage(e.to_string())),
        };

        toml::from_str(&contents)
            .map_err(|e| ClientError::Storage(format!("{}: {}", self.path.display(), e)))
    }

    async fn save(&self, settings: &AppSettings) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| ClientError::Storage(e.to_string()))?;
            }
        }

        let contents =
            toml::to_string_pretty(settings).map_err(|e| ClientError::Storage(e.to_string()))?;
        tokio::fs::write(&self.path, contents)
            .await
            .map_err(|e| ClientError::Storage(e.to_string()))
    }
}
