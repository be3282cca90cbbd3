// User settings domain model
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "u64", into = "u64")]
pub enum RefreshInterval {
    #[default]
    Seconds30,
    Seconds60,
    Seconds120,
    Seconds300,
}

impl RefreshInterval {
    pub fn as_secs(self) -> u64 {
        match self {
            RefreshInterval::Seconds30 => 30,
            RefreshInterval::Seconds60 => 60,
            RefreshInterval::Seconds120 => 120,
            RefreshInterval::Seconds300 => 300,
        }
    }

    pub fn as_duration(self) -> Duration {
        Duration::from_secs(self.as_secs())
    }
}

impl From<u64> for RefreshInterval {
    // Unknown persisted values fall back to the default
    fn from(secs: u64) -> Self {
        match secs {
            60 => RefreshInterval::Seconds60,
            120 => RefreshInterval::Seconds120,
            300 => RefreshInterval::Seconds300,
            _ => RefreshInterval::Seconds30,
        }
    }
}

impl From<RefreshInterval> for u64 {
    fn from(interval: RefreshInterval) -> Self {
        interval.as_secs()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub show_player_count: bool,
    pub show_motd: bool,
    pub blur_ip_address: bool,
    pub auto_refresh: bool,
    pub haptic_feedback: bool,
    pub refresh_interval: RefreshInterval,
    pub history_server_url: Option<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            show_player_count: true,
            show_motd: true,
            blur_ip_address: false,
            auto_refresh: false,
            haptic_feedback: true,
            refresh_interval: RefreshInterval::default(),
            history_server_url: None,
        }
    }
}

impl AppSettings {
    /// History base URL without trailing slash, `None` when unset or blank.
    pub fn history_base_url(&self) -> Option<String> {
        self.history_server_url
            .as_deref()
            .map(|url| url.trim().trim_end_matches('/'))
            .filter(|url| !url.is_empty())
            .map(str::to_string)
    }
}

/// Process-wide settings handle. Readers always see the latest value.
#[derive(Debug, Clone, Default)]
pub struct SharedSettings {
    inner: Arc<RwLock<AppSettings>>,
}

impl SharedSettings {
    pub fn new(settings: AppSettings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(settings)),
        }
    }

    pub fn get(&self) -> AppSettings {
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn replace(&self, settings: AppSettings) {
        match self.inner.write() {
            Ok(mut guard) => *guard = settings,
            Err(poisoned) => *poisoned.into_inner() = settings,
        }
    }

    pub fn history_base_url(&self) -> Option<String> {
        self.get().history_base_url()
    }
}
