// Server registry - Local list of tracked servers mirrored to the history backend
use crate::application::repositories::ServerStore;
use crate::application::status_client::StatusClient;
use crate::domain::error::ClientError;
use crate::domain::server::ServerRecord;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

pub struct ServerRegistry {
    store: Arc<dyn ServerStore>,
    client: Arc<StatusClient>,
    records: RwLock<Vec<ServerRecord>>,
}

impl ServerRegistry {
    pub fn new(store: Arc<dyn ServerStore>, client: Arc<StatusClient>) -> Self {
        Self {
            store,
            client,
            records: RwLock::new(Vec::new()),
        }
    }

    pub async fn load(&self) -> Result<Vec<ServerRecord>, ClientError> {
        let records = self.store.load().await?;
        tracing::info!("Loaded {} tracked servers", records.len());
        *self.records.write().await = records.clone();
        Ok(records)
    }

    pub async fn list(&self) -> Vec<ServerRecord> {
        self.records.read().await.clone()
    }

    pub async fn get(&self, id: Uuid) -> Option<ServerRecord> {
        self.records.read().await.iter().find(|r| r.id == id).cloned()
    }

    pub async fn add(&self, record: ServerRecord) -> Result<ServerRecord, ClientError> {
        record.validate()?;

        {
            let mut records = self.records.write().await;
            if records.iter().any(|r| r.id == record.id) {
                return Err(ClientError::InvalidRecord(format!(
                    "Server {} already exists",
                    record.id
                )));
            }
            let mut next = records.clone();
            next.push(record.clone());
            self.store.save(&next).await?;
            *records = next;
        }

        if self.client.history_configured() && !self.client.register_server(&record).await {
            tracing::warn!("{} saved locally but not registered for history", record.name);
        }

        Ok(record)
    }

    /// Replace the record with the same id. Returns the previous version.
    pub async fn edit(&self, record: ServerRecord) -> Result<ServerRecord, ClientError> {
        record.validate()?;

        let previous = {
            let mut records = self.records.write().await;
            let index = records
                .iter()
                .position(|r| r.id == record.id)
                .ok_or_else(|| ClientError::InvalidRecord(format!("Unknown server {}", record.id)))?;

            let mut next = records.clone();
            let previous = std::mem::replace(&mut next[index], record.clone());
            self.store.save(&next).await?;
            *records = next;
            previous
        };

        if self.client.history_configured()
            && !self.client.update_server(&record, &previous.address).await
        {
            tracing::warn!("{} saved locally but history server was not updated", record.name);
        }

        Ok(previous)
    }

    pub async fn remove(&self, id: Uuid) -> Result<ServerRecord, ClientError> {
        let removed = {
            let mut records = self.records.write().await;
            let index = records
                .iter()
                .position(|r| r.id == id)
                .ok_or_else(|| ClientError::InvalidRecord(format!("Unknown server {}", id)))?;

            let mut next = records.clone();
            let removed = next.remove(index);
            self.store.save(&next).await?;
            *records = next;
            removed
        };

        if self.client.history_configured() && !self.client.delete_server(&removed.address).await {
            tracing::warn!("{} removed locally but not from history server", removed.name);
        }

        Ok(removed)
    }

    /// Move the record at `from` to position `to`.
    pub async fn reorder(&self, from: usize, to: usize) -> Result<Vec<ServerRecord>, ClientError> {
        let mut records = self.records.write().await;
        if from >= records.len() || to >= records.len() {
            return Err(ClientError::InvalidRecord(format!(
                "Cannot move server {} to {} in a list of {}",
                from,
                to,
                records.len()
            )));
        }

        let mut next = records.clone();
        let record = next.remove(from);
        next.insert(to, record);
        self.store.save(&next).await?;
        *records = next.clone();
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::http_transport::mock::MockTransport;
    use crate::application::http_transport::HttpMethod;
    use crate::application::repositories::memory::MemoryServerStore;
    use crate::application::status_client::StatusClientOptions;
    use crate::domain::server::ServerVariant;
    use crate::domain::settings::{AppSettings, SharedSettings};
    use serde_json::json;

    struct Fixture {
        registry: ServerRegistry,
        store: Arc<MemoryServerStore>,
        transport: Arc<MockTransport>,
    }

    fn fixture(history: bool) -> Fixture {
        let store = Arc::new(MemoryServerStore::default());
        let transport = Arc::new(MockTransport::new());
        let settings = SharedSettings::new(AppSettings {
            history_server_url: history.then(|| "https://history.example.net".to_string()),
            ..AppSettings::default()
        });
        let client = Arc::new(StatusClient::new(
            transport.clone(),
            settings,
            StatusClientOptions::default(),
        ));
        Fixture {
            registry: ServerRegistry::new(store.clone(), client),
            store,
            transport,
        }
    }

    fn record(name: &str) -> ServerRecord {
        ServerRecord::new(name.into(), format!("{}.example.net", name), None, ServerVariant::Java)
    }

    #[tokio::test]
    async fn test_add_persists_without_history() {
        let f = fixture(false);
        f.registry.add(record("hub")).await.unwrap();

        assert_eq!(f.store.records.lock().unwrap().len(), 1);
        assert_eq!(f.transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_add_survives_history_failure() {
        let f = fixture(true);
        f.transport.push_json(500, json!({}));

        let added = f.registry.add(record("hub")).await.unwrap();
        assert_eq!(f.registry.list().await, vec![added]);
        assert_eq!(f.transport.requests()[0].method, HttpMethod::Post);
    }

    #[tokio::test]
    async fn test_add_rejects_invalid_record() {
        let f = fixture(false);
        let mut bad = record("hub");
        bad.address = String::new();

        assert!(matches!(f.registry.add(bad).await, Err(ClientError::InvalidRecord(_))));
        assert_eq!(*f.store.saves.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_edit_mirrors_with_previous_address() {
        let f = fixture(true);
        f.transport.push_json(200, json!({ "success": true }));
        f.transport.push_json(200, json!({ "success": true }));

        let original = f.registry.add(record("hub")).await.unwrap();
        let mut edited = original.clone();
        edited.address = "play.example.org".into();

        let previous = f.registry.edit(edited.clone()).await.unwrap();
        assert_eq!(previous.address, "hub.example.net");
        assert_eq!(f.registry.get(original.id).await, Some(edited));

        let update = &f.transport.requests()[1];
        assert_eq!(update.method, HttpMethod::Put);
        assert!(update.url.ends_with("/servers/hub.example.net"));
    }

    #[tokio::test]
    async fn test_remove_and_reorder() {
        let f = fixture(false);
        let a = f.registry.add(record("a")).await.unwrap();
        let b = f.registry.add(record("b")).await.unwrap();
        let c = f.registry.add(record("c")).await.unwrap();

        let order = f.registry.reorder(2, 0).await.unwrap();
        let ids: Vec<Uuid> = order.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![c.id, a.id, b.id]);

        f.registry.remove(a.id).await.unwrap();
        assert_eq!(f.store.records.lock().unwrap().len(), 2);
        assert!(f.registry.remove(a.id).await.is_err());
        assert!(f.registry.reorder(0, 5).await.is_err());
    }

    #[tokio::test]
    async fn test_load_replaces_cache() {
        let f = fixture(false);
        f.store.records.lock().unwrap().push(record("stored"));

        let loaded = f.registry.load().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(f.registry.list().await[0].name, "stored");
    }
}
