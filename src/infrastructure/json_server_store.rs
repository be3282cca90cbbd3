// JSON file store for the tracked server list
use crate::application::repositories::ServerStore;
use crate::domain::error::ClientError;
use crate::domain::server::ServerRecord;
use async_trait::async_trait;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct JsonServerStore {
    path: PathBuf,
}

impl JsonServerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ServerStore for JsonServerStore {
    async fn load(&self) -> Result<Vec<ServerRecord>, ClientError> {
        let contents = match tokio::fs::read(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ClientError::Storage(e.to_string())),
        };

        serde_json::from_slice(&contents)
            .map_err(|e| ClientError::Storage(format!("{}: {}", self.path.display(), e)))
    }

    async fn save(&self, records: &[ServerRecord]) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| ClientError::Storage(e.to_string()))?;
            }
        }

        let json = serde_json::to_vec_pretty(records)
            .map_err(|e| ClientError::Storage(e.to_string()))?;

        // Write to a sibling file first so a crash never leaves half a list
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| ClientError::Storage(e.to_string()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| ClientError::Storage(e.to_string()))
    }
}
