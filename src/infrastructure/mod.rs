// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod json_server_store;
pub mod reqwest_transport;
pub mod status_mapper;
pub mod toml_settings_store;
