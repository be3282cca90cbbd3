// Mapper from status and history API payloads to domain types
use crate::domain::error::ClientError;
use crate::domain::history::{HistorySample, HistorySeries};
use crate::domain::motd::deep_normalize;
use crate::domain::server::ServerRecord;
use crate::domain::status::{Motd, PlayerSample, Players, ServerStatusSnapshot};
use serde::Deserialize;
use serde_json::{json, Value};

/// Some servers literally send this string instead of omitting the field.
const NULL_SENTINEL: &str = "null";

#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    pub online: bool,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub version: Option<VersionPayload>,
    #[serde(default)]
    pub players: Option<PlayersPayload>,
    #[serde(default)]
    pub motd: Option<MotdPayload>,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VersionPayload {
    #[serde(default, alias = "name")]
    pub name_clean: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PlayersPayload {
    #[serde(default)]
    pub online: Option<u32>,
    #[serde(default)]
    pub max: Option<u32>,
    #[serde(default)]
    pub list: Option<Vec<PlayerPayload>>,
}

#[derive(Debug, Deserialize)]
pub struct PlayerPayload {
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub name_clean: Option<String>,
    #[serde(default)]
    pub name_raw: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MotdPayload {
    #[serde(default)]
    pub raw: Option<String>,
    #[serde(default)]
    pub clean: Option<String>,
    #[serde(default)]
    pub html: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub port: Option<Value>,
    #[serde(default)]
    pub data: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub struct SuccessEnvelope {
    #[serde(default)]
    pub success: bool,
}

#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub status: Option<String>,
}

pub fn parse_status(body: &[u8]) -> Result<ServerStatusSnapshot, ClientError> {
    let response: StatusResponse =
        serde_json::from_slice(body).map_err(|e| ClientError::Parse(e.to_string()))?;
    Ok(status_to_domain(response))
}

pub fn status_to_domain(response: StatusResponse) -> ServerStatusSnapshot {
    if !response.online {
        return ServerStatusSnapshot {
            ip_address: response.ip_address,
            ..ServerStatusSnapshot::offline()
        };
    }

    ServerStatusSnapshot {
        online: true,
        ip_address: response.ip_address,
        version_label: response.version.and_then(|v| present(v.name_clean)),
        players: response.players.map(players_to_domain),
        motd: response.motd.and_then(motd_to_domain),
        icon_base64: present(response.icon),
    }
}

fn players_to_domain(players: PlayersPayload) -> Players {
    let sample = players
        .list
        .unwrap_or_default()
        .into_iter()
        .filter_map(|p| {
            let name = present(p.name_clean).or_else(|| present(p.name_raw))?;
            Some(PlayerSample {
                uuid: p.uuid.unwrap_or_default(),
                name: deep_normalize(&name),
            })
        })
        .collect();

    Players::new(players.online.unwrap_or(0), players.max.unwrap_or(0), sample)
}

/// Prefer the clean MOTD, fall back to raw; either way run it through the
/// normalizer since "clean" text still arrives escaped or mis-encoded.
fn motd_to_domain(motd: MotdPayload) -> Option<Motd> {
    let raw = present(motd.raw);
    let chosen = present(motd.clean).or_else(|| raw.clone())?;

    Some(Motd {
        display: deep_normalize(&chosen),
        raw: raw.unwrap_or(chosen),
    })
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty() && s.trim() != NULL_SENTINEL)
}

/// Parse a history payload, dropping samples that do not have the expected
/// shape. Returns the series and how many samples were dropped.
pub fn parse_history(body: &[u8]) -> Result<(HistorySeries, usize), ClientError> {
    let response: HistoryResponse =
        serde_json::from_slice(body).map_err(|e| ClientError::Parse(e.to_string()))?;

    let total = response.data.len();
    let samples: Vec<HistorySample> = response.data.iter().filter_map(sample_from_value).collect();
    let dropped = total - samples.len();

    Ok((HistorySeries::new(samples), dropped))
}

fn sample_from_value(value: &Value) -> Option<HistorySample> {
    let timestamp_ms = timestamp_from_value(value.get("timestamp")?)?;
    let count = value
        .get("playerCount")
        .or_else(|| value.get("player_count"))?
        .as_u64()?;

    Some(HistorySample::new(timestamp_ms, u32::try_from(count).ok()?))
}

fn timestamp_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.parse::<i64>().ok().or_else(|| {
            chrono::DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|t| t.timestamp_millis())
        }),
        _ => None,
    }
}

pub fn registration_body(record: &ServerRecord) -> Value {
    json!({
        "id": record.id.to_string(),
        "name": record.name,
        "ip": record.address,
        "port": record.port,
        "type": record.variant.path_segment(),
    })
}
