// Presentation layer - View models and the lifecycle-owning controller
pub mod app_controller;
pub mod server_card;
