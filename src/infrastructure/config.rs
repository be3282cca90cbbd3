// Process configuration - file + environment layering
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct MonitorConfig {
    pub status_api: StatusApiSettings,
    pub history: HistorySettings,
    pub storage: StorageSettings,
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StatusApiSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HistorySettings {
    pub timeout_secs: u64,
    pub limit: u32,
    pub validate_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    pub servers_path: PathBuf,
    pub settings_path: PathBuf,
}

impl StatusApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl HistorySettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate_timeout(&self) -> Duration {
        Duration::from_secs(self.validate_timeout_secs)
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            status_api: StatusApiSettings {
                base_url: "https://api.mcstatus.io/v2/status".to_string(),
                timeout_secs: 10,
            },
            history: HistorySettings {
                timeout_secs: 10,
                limit: 1000,
                validate_timeout_secs: 5,
            },
            storage: StorageSettings {
                servers_path: PathBuf::from("data/servers.json"),
                settings_path: PathBuf::from("data/settings.toml"),
            },
            log_level: "mcstatus_monitor=info".to_string(),
        }
    }
}

fn defaults_builder() -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
    let d = MonitorConfig::default();
    Ok(config::Config::builder()
        .set_default("status_api.base_url", d.status_api.base_url)?
        .set_default("status_api.timeout_secs", d.status_api.timeout_secs as i64)?
        .set_default("history.timeout_secs", d.history.timeout_secs as i64)?
        .set_default("history.limit", i64::from(d.history.limit))?
        .set_default("history.validate_timeout_secs", d.history.validate_timeout_secs as i64)?
        .set_default(
            "storage.servers_path",
            d.storage.servers_path.to_string_lossy().to_string(),
        )?
        .set_default(
            "storage.settings_path",
            d.storage.settings_path.to_string_lossy().to_string(),
        )?
        .set_default("log_level", d.log_level)?)
}

/// Load `config/monitor.toml` (optional) overlaid by `MCSTATUS_*` variables,
/// e.g. `MCSTATUS_STATUS_API__TIMEOUT_SECS=15`.
pub fn load_monitor_config() -> anyhow::Result<MonitorConfig> {
    let settings = defaults_builder()?
        .add_source(config::File::with_name("config/monitor").required(false))
        .add_source(
            config::Environment::with_prefix("MCSTATUS")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Load from an explicit file, without environment overrides.
pub fn load_monitor_config_from(path: &std::path::Path) -> anyhow::Result<MonitorConfig> {
    let settings = defaults_builder()?
        .add_source(config::File::from(path))
        .build()?;

    Ok(settings.try_deserialize()?)
}
