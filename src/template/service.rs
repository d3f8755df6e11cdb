//! Public template service used by the event pipeline

use std::sync::Arc;

use crate::config::ModuleOptions;

use super::compiler::TemplateCompiler;
use super::loader::{BootstrapReport, TemplateLoader};
use super::registry::TemplateRegistry;
use super::types::{
    BootstrapError, StoredTemplate, TemplateMetadata, TemplateResult, TemplateSummary,
};

/// Read-only facade over the bootstrapped registry and module options.
///
/// Cheap to clone; every clone shares the same registry.
#[derive(Debug, Clone)]
pub struct TemplateService {
    registry: Arc<TemplateRegistry>,
    options: Arc<ModuleOptions>,
}

impl TemplateService {
    /// Wrap an already populated registry
    pub fn new(registry: TemplateRegistry, options: ModuleOptions) -> Self {
        Self {
            registry: Arc::new(registry),
            options: Arc::new(options),
        }
    }

    /// Load all templates from `options.templates_dir` and publish the service
    pub async fn bootstrap(
        options: ModuleOptions,
    ) -> Result<(Self, BootstrapReport), BootstrapError> {
        tracing::info!("Loading email template module");

        let compiler = TemplateCompiler::new().strict(options.strict_variables);
        let loader = TemplateLoader::new(options.templates_dir.clone(), compiler);
        let (registry, report) = loader.load().await?;

        Ok((Self::new(registry, options), report))
    }

    /// Check if an event is declared in the configuration
    pub fn is_event_enabled(&self, event: &str) -> bool {
        let event = event.trim();
        self.options.events.iter().any(|e| e == event)
    }

    /// Whether order emails should carry a generated invoice
    pub fn send_invoice_on_order(&self) -> bool {
        self.options.send_invoice_on_order
    }

    /// Get a stored template by key
    pub fn get_template(&self, key: &str) -> TemplateResult<&StoredTemplate> {
        self.registry.get(key)
    }

    /// Render a template by key with the provided variables
    pub fn render(&self, key: &str, vars: &serde_json::Value) -> TemplateResult<String> {
        self.registry.render(key, vars)
    }

    /// Metadata of a template by key
    pub fn get_metadata(&self, key: &str) -> TemplateResult<&TemplateMetadata> {
        self.registry.get(key).map(StoredTemplate::metadata)
    }

    /// Iterate over registered templates and their metadata
    pub fn list_templates(&self) -> impl Iterator<Item = (&str, &TemplateMetadata)> + '_ {
        self.registry.list()
    }

    pub fn summaries(&self) -> Vec<TemplateSummary> {
        self.registry.summaries()
    }

    pub fn template_count(&self) -> usize {
        self.registry.len()
    }

    /// Log all registered templates and their metadata
    pub fn log_templates(&self) {
        self.registry.log_templates();
    }

    pub fn options(&self) -> &ModuleOptions {
        &self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::TemplateError;
    use serde_json::json;

    fn service_with_events(events: &[&str]) -> TemplateService {
        let options = ModuleOptions::default().with_events(events.iter().copied());
        TemplateService::new(TemplateRegistry::new(), options)
    }

    #[test]
    fn test_is_event_enabled() {
        let service = service_with_events(&["order.placed", "invite.created"]);

        assert!(service.is_event_enabled("order.placed"));
        assert!(service.is_event_enabled("  invite.created "));
        assert!(!service.is_event_enabled("auth.password_reset"));
        assert!(!service.is_event_enabled("order"));
        assert!(!service.is_event_enabled(""));
    }

    #[test]
    fn test_no_events_configured() {
        let service = service_with_events(&[]);
        assert!(!service.is_event_enabled("order.placed"));
    }

    #[test]
    fn test_invoice_flag() {
        let options = ModuleOptions::default().with_invoice_on_order(true);
        let service = TemplateService::new(TemplateRegistry::new(), options);
        assert!(service.send_invoice_on_order());
        assert!(!service_with_events(&[]).send_invoice_on_order());
    }

    #[test]
    fn test_lookups_on_empty_service() {
        let service = service_with_events(&[]);

        assert!(matches!(
            service.render("order-placed", &json!({})),
            Err(TemplateError::NotFound(_))
        ));
        assert!(matches!(
            service.get_metadata(""),
            Err(TemplateError::NotFound(_))
        ));
        assert_eq!(service.list_templates().count(), 0);
    }

    #[tokio::test]
    async fn test_bootstrap_invalid_directory() {
        let dir = tempfile::tempdir().unwrap();
        let options = ModuleOptions::new(dir.path().join("missing"));

        let result = TemplateService::bootstrap(options).await;
        assert!(matches!(result, Err(BootstrapError::InvalidDirectory(_))));
    }
}
