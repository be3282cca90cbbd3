// Server status snapshot domain model
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};

/// Sampled player lists beyond this length are truncated.
pub const MAX_PLAYER_SAMPLE: usize = 12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSample {
    pub uuid: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Players {
    pub online_count: u32,
    pub max_count: u32,
    pub sample: Vec<PlayerSample>,
}

impl Players {
    pub fn new(online_count: u32, max_count: u32, mut sample: Vec<PlayerSample>) -> Self {
        sample.truncate(MAX_PLAYER_SAMPLE);
        Self {
            online_count,
            max_count,
            sample,
        }
    }

    pub fn label(&self) -> String {
        format!("{} / {}", self.online_count, self.max_count)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Motd {
    /// Text as the server sent it.
    pub raw: String,
    /// Normalized text ready for display.
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerStatusSnapshot {
    pub online: bool,
    pub ip_address: Option<String>,
    pub version_label: Option<String>,
    pub players: Option<Players>,
    pub motd: Option<Motd>,
    pub icon_base64: Option<String>,
}

impl ServerStatusSnapshot {
    pub fn offline() -> Self {
        Self {
            online: false,
            ip_address: None,
            version_label: None,
            players: None,
            motd: None,
            icon_base64: None,
        }
    }

    /// Decode the favicon, accepting both bare base64 and `data:` URIs.
    pub fn icon_bytes(&self) -> Option<Vec<u8>> {
        let icon = self.icon_base64.as_deref()?;
        let payload = match icon.split_once("base64,") {
            Some((prefix, data)) if prefix.starts_with("data:") => data,
            _ => icon,
        };

        match general_purpose::STANDARD.decode(payload.trim()) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                tracing::debug!("Ignoring undecodable server icon: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_players_sample_is_bounded() {
        let sample = (0..20)
            .map(|i| PlayerSample {
                uuid: format!("uuid-{}", i),
                name: format!("player{}", i),
            })
            .collect();
        let players = Players::new(20, 100, sample);
        assert_eq!(players.sample.len(), MAX_PLAYER_SAMPLE);
        assert_eq!(players.label(), "20 / 100");
    }

    #[test]
    fn test_icon_bytes_strips_data_uri() {
        let mut snapshot = ServerStatusSnapshot::offline();
        snapshot.icon_base64 = Some("data:image/png;base64,aGVsbG8=".to_string());
        assert_eq!(snapshot.icon_bytes(), Some(b"hello".to_vec()));

        snapshot.icon_base64 = Some("aGVsbG8=".to_string());
        assert_eq!(snapshot.icon_bytes(), Some(b"hello".to_vec()));

        snapshot.icon_base64 = Some("data:image/png;base64,***".to_string());
        assert_eq!(snapshot.icon_bytes(), None);

        snapshot.icon_base64 = None;
        assert_eq!(snapshot.icon_bytes(), None);
    }
}
