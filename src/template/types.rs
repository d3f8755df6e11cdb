//! Template types and error definitions

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

/// Template-specific error type
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("No template found with key: \"{0}\"")]
    NotFound(String),

    #[error("Invalid template key: \"{0}\"")]
    InvalidKey(String),

    #[error("Failed to compile template '{name}': {source}")]
    Compile {
        name: String,
        #[source]
        source: Box<handlebars::TemplateError>,
    },

    #[error("Failed to render template '{key}': {message}")]
    Render { key: String, message: String },
}

/// Result type for template operations
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Fatal errors that stop the template module from starting
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("'{}' is not a valid template directory", .0.display())]
    InvalidDirectory(PathBuf),

    #[error("Failed to read template directory '{}': {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A compiled render function.
///
/// Implementations must be pure: the same variables always produce the same
/// output, and nothing outside the renderer is touched.
pub trait Render: Send + Sync {
    fn render(&self, vars: &serde_json::Value) -> TemplateResult<String>;
}

impl<F> Render for F
where
    F: Fn(&serde_json::Value) -> TemplateResult<String> + Send + Sync,
{
    fn render(&self, vars: &serde_json::Value) -> TemplateResult<String> {
        self(vars)
    }
}

/// Sidecar metadata attached to a template (e.g. the subject line)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TemplateMetadata(serde_json::Map<String, serde_json::Value>);

impl TemplateMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&serde_json::Value> {
        self.0.get(field)
    }

    /// Subject line, when the sidecar declares one as a string
    pub fn subject(&self) -> Option<&str> {
        self.0.get("subject").and_then(|v| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.0
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for TemplateMetadata {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        Self(map)
    }
}

/// Renderer and metadata held by the registry under a template key
#[derive(Clone)]
pub struct StoredTemplate {
    renderer: Arc<dyn Render>,
    metadata: TemplateMetadata,
}

impl StoredTemplate {
    pub fn new(renderer: Arc<dyn Render>, metadata: TemplateMetadata) -> Self {
        Self { renderer, metadata }
    }

    pub fn render(&self, vars: &serde_json::Value) -> TemplateResult<String> {
        self.renderer.render(vars)
    }

    pub fn metadata(&self) -> &TemplateMetadata {
        &self.metadata
    }
}

impl fmt::Debug for StoredTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredTemplate")
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

/// Template entry as exposed for diagnostics and listing
#[derive(Debug, Clone, Serialize)]
pub struct TemplateSummary {
    pub key: String,
    pub metadata: TemplateMetadata,
}

/// Response for listing templates
#[derive(Debug, Serialize)]
pub struct TemplateListResponse {
    /// Registered templates
    pub templates: Vec<TemplateSummary>,

    /// Total count
    pub total: usize,
}
