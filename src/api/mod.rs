//! API layer - HTTP endpoint handlers organized by domain.

mod health;
mod routes;
mod template;

// Re-export all handlers for use in server/app.rs
pub use health::{health, HealthResponse, TemplateHealthResponse};
pub use routes::api_routes;
pub use template::{get_template, list_templates, render_template, RenderedTemplateResponse};
