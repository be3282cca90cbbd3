// Application layer - Use cases over the domain, I/O behind traits
pub mod auto_refresh;
pub mod coordinator_pool;
pub mod history_service;
pub mod http_transport;
pub mod refresh_coordinator;
pub mod repositories;
pub mod server_registry;
pub mod settings_service;
pub mod status_client;
