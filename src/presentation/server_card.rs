// Server card view model - What a status card displays
use crate::application::refresh_coordinator::{RefreshCoordinator, RefreshState};
use crate::domain::server::ServerRecord;
use crate::domain::settings::AppSettings;
use crate::domain::status::ServerStatusSnapshot;
use uuid::Uuid;

const BLUR_CHAR: char = '•';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardIndicator {
    Loading,
    Online,
    Offline,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerCardView {
    pub id: Uuid,
    pub title: String,
    pub address_label: String,
    pub indicator: CardIndicator,
    pub players_label: Option<String>,
    pub player_names: Vec<String>,
    pub motd: Option<String>,
    pub version: Option<String>,
    pub icon: Option<Vec<u8>>,
    pub error: Option<String>,
    /// Content comes from an earlier refresh because the latest one failed.
    pub stale: bool,
    /// The refresh control is disabled while a refresh is loading.
    pub refresh_enabled: bool,
}

impl ServerCardView {
    pub fn from_coordinator(coordinator: &RefreshCoordinator, settings: &AppSettings) -> Self {
        let last_known_good = coordinator.last_known_good();
        Self::project(
            &coordinator.record(),
            &coordinator.state(),
            last_known_good.as_deref(),
            settings,
        )
    }

    pub fn project(
        record: &ServerRecord,
        state: &RefreshState,
        last_known_good: Option<&ServerStatusSnapshot>,
        settings: &AppSettings,
    ) -> Self {
        let (content, error) = match state {
            RefreshState::Success(snapshot) => (Some(&**snapshot), None),
            RefreshState::Error(message) => (last_known_good, Some(message.clone())),
            RefreshState::Loading => (last_known_good, None),
        };

        let indicator = match (state, content) {
            (RefreshState::Loading, _) => CardIndicator::Loading,
            (_, Some(snapshot)) if snapshot.online => CardIndicator::Online,
            (_, Some(_)) => CardIndicator::Offline,
            (_, None) => CardIndicator::Error,
        };

        let address = record.display_address();
        let address_label = if settings.blur_ip_address {
            blur_address(&address)
        } else {
            address
        };

        let players = content.and_then(|s| s.players.as_ref());

        Self {
            id: record.id,
            title: record.name.clone(),
            address_label,
            indicator,
            players_label: players
                .filter(|_| settings.show_player_count)
                .map(|p| p.label()),
            player_names: players
                .map(|p| p.sample.iter().map(|s| s.name.clone()).collect())
                .unwrap_or_default(),
            motd: content
                .filter(|_| settings.show_motd)
                .and_then(|s| s.motd.as_ref())
                .map(|m| m.display.clone()),
            version: content.and_then(|s| s.version_label.clone()),
            icon: content.and_then(|s| s.icon_bytes()),
            stale: error.is_some() && content.is_some(),
            error,
            refresh_enabled: !state.is_loading(),
        }
    }
}

/// Hide an address while keeping its shape (dots, colons).
pub fn blur_address(address: &str) -> String {
    address
        .chars()
        .map(|c| if c.is_alphanumeric() { BLUR_CHAR } else { c })
        .collect()
}
