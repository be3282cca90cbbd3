// Minecraft server status monitoring - status refresh and player history client
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

pub use application::refresh_coordinator::{RefreshMode, RefreshState};
pub use domain::error::ClientError;
pub use presentation::app_controller::AppController;
