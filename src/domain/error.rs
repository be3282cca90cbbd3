// Client error taxonomy shared by every layer
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ClientError {
    #[error("network unavailable: {0}")]
    NetworkUnavailable(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("status lookup failed with HTTP {http_code}")]
    StatusFetch { http_code: u16 },

    #[error("history lookup failed with HTTP {http_code}")]
    HistoryFetch { http_code: u16 },

    #[error("unexpected response body: {0}")]
    Parse(String),

    #[error("history server is not configured")]
    HistoryNotConfigured,

    #[error("local storage error: {0}")]
    Storage(String),

    #[error("invalid server record: {0}")]
    InvalidRecord(String),
}

impl ClientError {
    /// Network-level failures the user can simply retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::NetworkUnavailable(_) | Self::Timeout(_))
    }

    /// Copy shown on a server card or chart when this error surfaces.
    pub fn user_message(&self) -> String {
        match self {
            Self::NetworkUnavailable(_) => "Network unavailable, tap to retry".to_string(),
            Self::Timeout(_) => "Request timed out, tap to retry".to_string(),
            Self::StatusFetch { http_code } => format!("Status lookup failed (HTTP {})", http_code),
            Self::HistoryFetch { http_code: 403 } => {
                "History server is rate limiting requests, try again later".to_string()
            }
            Self::HistoryFetch { http_code: 404 } => {
                "No history recorded for this server yet".to_string()
            }
            Self::HistoryFetch { http_code } => format!("History lookup failed (HTTP {})", http_code),
            Self::Parse(_) => "Server returned an unexpected response".to_string(),
            Self::HistoryNotConfigured => "Configure a history server in settings".to_string(),
            Self::Storage(msg) => format!("Could not save servers: {}", msg),
            Self::InvalidRecord(msg) => msg.clone(),
        }
    }
}
