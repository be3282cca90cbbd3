// Status client - Boundary to the status lookup API and the history backend
use crate::application::http_transport::{HttpMethod, HttpRequest, HttpTransport};
use crate::domain::error::ClientError;
use crate::domain::history::{HistorySeries, TimeWindow};
use crate::domain::server::{ServerRecord, ServerVariant};
use crate::domain::settings::SharedSettings;
use crate::domain::status::ServerStatusSnapshot;
use crate::infrastructure::config::MonitorConfig;
use crate::infrastructure::status_mapper::{
    parse_history, parse_status, registration_body, HealthResponse, SuccessEnvelope,
};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct StatusClientOptions {
    pub status_base_url: String,
    pub status_timeout: Duration,
    pub history_timeout: Duration,
    pub history_limit: u32,
    pub validate_timeout: Duration,
}

impl Default for StatusClientOptions {
    fn default() -> Self {
        Self::from(&MonitorConfig::default())
    }
}

impl From<&MonitorConfig> for StatusClientOptions {
    fn from(config: &MonitorConfig) -> Self {
        Self {
            status_base_url: config.status_api.base_url.trim_end_matches('/').to_string(),
            status_timeout: config.status_api.timeout(),
            history_timeout: config.history.timeout(),
            history_limit: config.history.limit,
            validate_timeout: config.history.validate_timeout(),
        }
    }
}

#[derive(Clone)]
pub struct StatusClient {
    transport: Arc<dyn HttpTransport>,
    settings: SharedSettings,
    options: StatusClientOptions,
}

impl StatusClient {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        settings: SharedSettings,
        options: StatusClientOptions,
    ) -> Self {
        Self {
            transport,
            settings,
            options,
        }
    }

    /// True when a history base URL is set right now.
    pub fn history_configured(&self) -> bool {
        self.settings.history_base_url().is_some()
    }

    pub async fn fetch_status(
        &self,
        address: &str,
        variant: ServerVariant,
        port: Option<u16>,
    ) -> Result<ServerStatusSnapshot, ClientError> {
        let target = match port {
            Some(port) => format!("{}:{}", urlencoding::encode(address), port),
            None => urlencoding::encode(address).into_owned(),
        };
        let url = format!(
            "{}/{}/{}",
            self.options.status_base_url,
            variant.path_segment(),
            target
        );

        let response = self
            .transport
            .send(HttpRequest::get(url, self.options.status_timeout))
            .await?;

        if !response.is_ok() {
            return Err(ClientError::StatusFetch {
                http_code: response.status,
            });
        }

        parse_status(&response.body)
    }

    pub async fn fetch_history(
        &self,
        address: &str,
        port: u16,
        window: TimeWindow,
    ) -> Result<HistorySeries, ClientError> {
        // Read at call time so a settings change applies to the next fetch
        let base = self
            .settings
            .history_base_url()
            .ok_or(ClientError::HistoryNotConfigured)?;

        let range = window.select();
        let url = format!("{}/history/{}/{}", base, urlencoding::encode(address), port);
        let request = HttpRequest::get(url, self.options.history_timeout)
            .query("start", range.start_ms)
            .query("end", range.end_ms)
            .query("limit", self.options.history_limit);

        let response = self.transport.send(request).await?;
        if !response.is_ok() {
            return Err(ClientError::HistoryFetch {
                http_code: response.status,
            });
        }

        let (series, dropped) = parse_history(&response.body)?;
        if dropped > 0 {
            tracing::warn!(
                "Dropped {} malformed history samples for {}:{}",
                dropped,
                address,
                port
            );
        }

        Ok(series)
    }

    /// Best-effort: 200 with `success` or 409 (already registered) count as
    /// success, everything else is logged and reported as `false`.
    pub async fn register_server(&self, record: &ServerRecord) -> bool {
        let Some(base) = self.settings.history_base_url() else {
            return false;
        };

        let request = HttpRequest::new(
            HttpMethod::Post,
            format!("{}/servers/add", base),
            self.options.history_timeout,
        )
        .json(registration_body(record));

        match self.transport.send(request).await {
            Ok(response) if response.status == 409 => {
                tracing::debug!("{} already registered with history server", record.address);
                true
            }
            Ok(response) if response.is_ok() => {
                let success = response
                    .json::<SuccessEnvelope>()
                    .map(|e| e.success)
                    .unwrap_or(false);
                if !success {
                    tracing::warn!("History server rejected registration of {}", record.address);
                }
                success
            }
            Ok(response) => {
                tracing::warn!(
                    "Registering {} with history server failed with HTTP {}",
                    record.address,
                    response.status
                );
                false
            }
            Err(e) => {
                tracing::warn!("Registering {} with history server failed: {}", record.address, e);
                false
            }
        }
    }

    /// Update the record stored under `previous_address`, registering it
    /// instead when the history server does not know it.
    pub async fn update_server(&self, record: &ServerRecord, previous_address: &str) -> bool {
        let Some(base) = self.settings.history_base_url() else {
            return false;
        };

        let request = HttpRequest::new(
            HttpMethod::Put,
            format!("{}/servers/{}", base, urlencoding::encode(previous_address)),
            self.options.history_timeout,
        )
        .json(registration_body(record));

        match self.transport.send(request).await {
            Ok(response) if response.status == 404 => {
                tracing::debug!("{} unknown to history server, registering", previous_address);
                self.register_server(record).await
            }
            Ok(response) if response.is_ok() => response
                .json::<SuccessEnvelope>()
                .map(|e| e.success)
                .unwrap_or(false),
            Ok(response) => {
                tracing::warn!(
                    "Updating {} on history server failed with HTTP {}",
                    previous_address,
                    response.status
                );
                false
            }
            Err(e) => {
                tracing::warn!("Updating {} on history server failed: {}", previous_address, e);
                false
            }
        }
    }

    pub async fn delete_server(&self, address: &str) -> bool {
        let Some(base) = self.settings.history_base_url() else {
            return false;
        };

        let request = HttpRequest::new(
            HttpMethod::Delete,
            format!("{}/servers/{}", base, urlencoding::encode(address)),
            self.options.history_timeout,
        );

        match self.transport.send(request).await {
            Ok(response) if response.is_ok() => response
                .json::<SuccessEnvelope>()
                .map(|e| e.success)
                .unwrap_or(false),
            Ok(response) => {
                tracing::warn!(
                    "Deleting {} from history server failed with HTTP {}",
                    address,
                    response.status
                );
                false
            }
            Err(e) => {
                tracing::warn!("Deleting {} from history server failed: {}", address, e);
                false
            }
        }
    }

    /// Check that `url` points at a healthy history server.
    pub async fn validate_base_url(&self, url: &str) -> bool {
        let base = url.trim().trim_end_matches('/');
        if base.is_empty() {
            return false;
        }

        let request = HttpRequest::get(format!("{}/health", base), self.options.validate_timeout);
        match self.transport.send(request).await {
            Ok(response) if response.is_ok() => response
                .json::<HealthResponse>()
                .map(|h| h.status.as_deref() == Some("ok"))
                .unwrap_or(false),
            Ok(response) => {
                tracing::debug!("Health check of {} returned HTTP {}", base, response.status);
                false
            }
            Err(e) => {
                tracing::debug!("Health check of {} failed: {}", base, e);
                false
            }
        }
    }
}
