//! Email template system.
//!
//! This module provides:
//! - Key normalization for template file names (`Auth_Invite.hbs` -> `auth-invite`)
//! - Handlebars compilation, done once per file at startup
//! - Optional JSON sidecar metadata per template (e.g. the subject line)
//! - A read-only registry populated by a one-shot directory bootstrap
//! - [`TemplateService`], the lookup/render facade used by the send pipeline
//!
//! # Example
//!
//! ```ignore
//! let options = ModuleOptions::new("src/templates/emails")
//!     .with_events(["order.placed"]);
//!
//! let (service, _report) = TemplateService::bootstrap(options).await?;
//!
//! if service.is_event_enabled("order.placed") {
//!     let html = service.render("order-placed", &json!({ "total": 42 }))?;
//!     let subject = service.get_metadata("order-placed")?.subject();
//! }
//! ```

mod compiler;
mod key;
mod loader;
mod metadata;
mod registry;
mod service;
mod types;

pub use compiler::{CompiledTemplate, TemplateCompiler};
pub use key::normalize_key;
pub use loader::{BootstrapReport, TemplateLoader, TEMPLATE_EXTENSION};
pub use metadata::{load_metadata, metadata_path, METADATA_EXTENSION};
pub use registry::TemplateRegistry;
pub use service::TemplateService;
pub use types::{
    BootstrapError, Render, StoredTemplate, TemplateError, TemplateListResponse,
    TemplateMetadata, TemplateResult, TemplateSummary,
};
