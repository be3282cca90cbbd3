// Server record domain model
use crate::domain::error::ClientError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ServerVariant {
    #[serde(alias = "java_edition")]
    Java,
    #[serde(alias = "bedrock_edition")]
    Bedrock,
}

impl ServerVariant {
    pub fn default_port(self) -> u16 {
        match self {
            ServerVariant::Java => 25565,
            ServerVariant::Bedrock => 19132,
        }
    }

    /// Path segment used by the status lookup API.
    pub fn path_segment(self) -> &'static str {
        match self {
            ServerVariant::Java => "java",
            ServerVariant::Bedrock => "bedrock",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerRecord {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub port: u16,
    pub variant: ServerVariant,
}

impl ServerRecord {
    pub fn new(name: String, address: String, port: Option<u16>, variant: ServerVariant) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            address: address.trim().to_string(),
            port: port.unwrap_or_else(|| variant.default_port()),
            variant,
        }
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if self.name.trim().is_empty() {
            return Err(ClientError::InvalidRecord("Server name is required".to_string()));
        }
        if self.address.trim().is_empty() {
            return Err(ClientError::InvalidRecord("Server address is required".to_string()));
        }
        if self.address.contains(char::is_whitespace) {
            return Err(ClientError::InvalidRecord(
                "Server address must not contain spaces".to_string(),
            ));
        }
        if self.port == 0 {
            return Err(ClientError::InvalidRecord(
                "Port must be between 1 and 65535".to_string(),
            ));
        }
        Ok(())
    }

    /// Port to put in lookups, `None` when it is the variant's default.
    pub fn explicit_port(&self) -> Option<u16> {
        (self.port != self.variant.default_port()).then_some(self.port)
    }

    pub fn display_address(&self) -> String {
        match self.explicit_port() {
            Some(port) => format!("{}:{}", self.address, port),
            None => self.address.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ports() {
        let java = ServerRecord::new("Hub".into(), "mc.example.net".into(), None, ServerVariant::Java);
        assert_eq!(java.port, 25565);
        assert_eq!(java.display_address(), "mc.example.net");

        let bedrock = ServerRecord::new("Pe".into(), "pe.example.net".into(), None, ServerVariant::Bedrock);
        assert_eq!(bedrock.port, 19132);
        assert_eq!(bedrock.explicit_port(), None);
    }

    #[test]
    fn test_custom_port_is_displayed() {
        let record = ServerRecord::new(
            "Modded".into(),
            " 10.0.0.4 ".into(),
            Some(25570),
            ServerVariant::Java,
        );
        assert_eq!(record.address, "10.0.0.4");
        assert_eq!(record.display_address(), "10.0.0.4:25570");
    }

    #[test]
    fn test_validate() {
        let mut record = ServerRecord::new("Hub".into(), "mc.example.net".into(), None, ServerVariant::Java);
        assert!(record.validate().is_ok());

        record.port = 0;
        assert!(matches!(record.validate(), Err(ClientError::InvalidRecord(_))));

        record.port = 25565;
        record.address = "mc example".into();
        assert!(record.validate().is_err());

        record.address = "mc.example.net".into();
        record.name = "   ".into();
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_ids_are_unique() {
        let a = ServerRecord::new("A".into(), "a.net".into(), None, ServerVariant::Java);
        let b = ServerRecord::new("A".into(), "a.net".into(), None, ServerVariant::Java);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_variant_serialization() {
        let json = serde_json::to_string(&ServerVariant::Bedrock).unwrap();
        assert_eq!(json, "\"bedrock\"");

        let parsed: ServerVariant = serde_json::from_str("\"java_edition\"").unwrap();
        assert_eq!(parsed, ServerVariant::Java);
    }
}
