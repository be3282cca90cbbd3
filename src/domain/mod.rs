// Domain layer - Pure models and algorithms, no I/O
pub mod error;
pub mod history;
pub mod motd;
pub mod server;
pub mod settings;
pub mod status;
