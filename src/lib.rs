// Shared components
pub mod config;
pub mod error;

// Domain layer (business logic)
pub mod notification;
pub mod template;

// Application layer
pub mod api;
pub mod server;
pub mod triggers;
